mod scene;

use anyhow::Context;
use nestscroll_foundation::{GestureConfig, TouchAction, TouchEvent};
use nestscroll_ui::{
    HeaderSource, NestedScrollConfig, NestedScrollLayout, ScrollChildSource, ViewRef,
};
use scene::{Banner, FeedList, HEADER_ID, LIST_ID};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use web_time::Instant;

const SCREEN_WIDTH: i32 = 1080;
const SCREEN_HEIGHT: i32 = 1920;
const HEADER_HEIGHT: i32 = 600;
const LIST_CONTENT_HEIGHT: i32 = 12_000;
const DENSITY: f32 = 2.75;
const FRAME: Duration = Duration::from_millis(16);
const TOUCH_STEP: Duration = Duration::from_millis(8);

struct Demo {
    layout: NestedScrollLayout,
    list: Rc<RefCell<FeedList>>,
    start: Instant,
}

impl Demo {
    fn new() -> anyhow::Result<Self> {
        let header = Rc::new(RefCell::new(Banner::new(HEADER_HEIGHT)));
        let list = Rc::new(RefCell::new(FeedList::new(LIST_CONTENT_HEIGHT, DENSITY)));
        let config = NestedScrollConfig::default()
            .with_header(HeaderSource::ById(HEADER_ID))
            .with_scroll_child(ScrollChildSource::ById(LIST_ID))
            .with_gesture(GestureConfig::for_density(DENSITY));
        let mut layout =
            NestedScrollLayout::new(config, vec![header as ViewRef, list.clone() as ViewRef])
                .context("building the nested scroll container")?;
        layout.measure(SCREEN_WIDTH, SCREEN_HEIGHT);
        layout.layout();
        Ok(Self {
            layout,
            list,
            start: Instant::now(),
        })
    }

    fn now_ms(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }

    fn now_nanos(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn touch(&mut self, action: TouchAction, y: f32) {
        let event = TouchEvent::single(action, self.now_ms(), SCREEN_WIDTH as f32 / 2.0, y);
        self.layout.dispatch_touch_event(&event);
    }

    /// Drags from `from_y` to `to_y` over `duration`, holds still for `hold`
    /// and lifts the finger.
    fn swipe(&mut self, from_y: f32, to_y: f32, duration: Duration, hold: Duration) {
        self.touch(TouchAction::Down, from_y);
        let steps = (duration.as_millis() / TOUCH_STEP.as_millis()).max(1) as usize;
        for step in 1..=steps {
            std::thread::sleep(TOUCH_STEP);
            let t = step as f32 / steps as f32;
            self.touch(TouchAction::Move, from_y + (to_y - from_y) * t);
        }
        std::thread::sleep(hold);
        self.touch(TouchAction::Up, to_y);
    }

    /// Runs frames until neither the container nor the list animates.
    fn settle(&mut self) -> usize {
        let mut frames = 0;
        loop {
            let now = self.now_nanos();
            self.layout.on_frame(now);
            self.list.borrow_mut().tick(now);
            if self.layout.take_invalidation() {
                frames += 1;
            }
            if !self.layout.has_pending_work() && !self.list.borrow().is_flinging() {
                return frames;
            }
            std::thread::sleep(FRAME);
        }
    }

    fn report(&self, label: &str) {
        log::info!(
            "{label}: container at {}/{HEADER_HEIGHT}, list offset {}",
            self.layout.current_scroll_y(),
            self.list.borrow().scroll_offset()
        );
    }
}

fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut demo = Demo::new()?;
    demo.report("start");

    // Released after a pause, so no fling.
    demo.swipe(1500.0, 1300.0, Duration::from_millis(400), Duration::from_millis(150));
    demo.settle();
    demo.report("slow drag");

    // Fast enough to run past the header and continue inside the list.
    demo.swipe(1500.0, 1300.0, Duration::from_millis(64), Duration::ZERO);
    let frames = demo.settle();
    demo.report(&format!("flick ({frames} redrawn frames)"));

    demo.swipe(800.0, 1400.0, Duration::from_millis(200), Duration::from_millis(100));
    demo.settle();
    demo.report("pull while list is scrolled");

    demo.layout.scroll_to_nested_child_top();
    demo.settle();
    demo.report("scroll to child top");

    Ok(())
}
