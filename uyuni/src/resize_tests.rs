use crate::{
    AnimationNode, Parameters, RESIZE_DEBOUNCE_MS, ResizeDebouncer, Scene, Scheduler, Viewport,
    pixel_projection,
};

/// Timer host that only tracks which handles are still live.
#[derive(Default)]
struct FakeScheduler {
    next: u32,
    live: Vec<u32>,
    cancelled: Vec<u32>,
    delays: Vec<u32>,
}

impl Scheduler for FakeScheduler {
    type Handle = u32;

    fn schedule(&mut self, delay_ms: u32) -> u32 {
        self.next += 1;
        self.live.push(self.next);
        self.delays.push(delay_ms);
        self.next
    }

    fn cancel(&mut self, handle: u32) {
        self.live.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

fn viewport(w: f32, h: f32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

#[test]
fn burst_of_events_leaves_one_timer_with_last_size() {
    let mut scheduler = FakeScheduler::default();
    let mut debouncer = ResizeDebouncer::default();

    for (w, h) in [(800.0, 600.0), (900.0, 600.0), (1000.0, 700.0), (1024.0, 768.0)] {
        debouncer.on_resize(viewport(w, h), &mut scheduler);
    }

    assert_eq!(scheduler.live.len(), 1);
    assert_eq!(scheduler.cancelled, vec![1, 2, 3]);
    assert!(scheduler.delays.iter().all(|d| *d == RESIZE_DEBOUNCE_MS));
    assert!(debouncer.is_pending());

    assert_eq!(debouncer.fire(), Some(viewport(1024.0, 768.0)));
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.fire(), None);
}

#[test]
fn separate_bursts_each_produce_a_recomputation() {
    let mut scheduler = FakeScheduler::default();
    let mut debouncer = ResizeDebouncer::new(250);

    debouncer.on_resize(viewport(640.0, 480.0), &mut scheduler);
    assert_eq!(debouncer.fire(), Some(viewport(640.0, 480.0)));

    debouncer.on_resize(viewport(1280.0, 720.0), &mut scheduler);
    assert_eq!(debouncer.fire(), Some(viewport(1280.0, 720.0)));

    assert!(scheduler.cancelled.is_empty());
    assert_eq!(scheduler.delays, vec![250, 250]);
}

#[test]
fn fired_resize_reanchors_background_and_backdrop_only() {
    let params = Parameters::default();
    let start = viewport(1920.0, 1080.0);
    let mut scene = Scene::compose(
        start,
        [2048.0, 1024.0],
        Some(AnimationNode::idle("idle", start)),
        &params,
    );

    let mut scheduler = FakeScheduler::default();
    let mut debouncer = ResizeDebouncer::default();
    debouncer.on_resize(viewport(1000.0, 1000.0), &mut scheduler);
    debouncer.on_resize(viewport(1080.0, 1920.0), &mut scheduler);
    let size = debouncer.fire().unwrap();
    scene.apply_resize(size);

    let background = &scene.container.background;
    assert_eq!(background.position, [540.0, 1920.0]);
    assert!((background.scale - 1920.0 / 1080.0).abs() < 1.0e-3);
    assert_eq!(scene.backdrop.width, 1080.0);
    assert_eq!(scene.backdrop.height, 1920.0);
    assert_eq!(
        scene.container.animation.as_ref().unwrap().position,
        [960.0, 1080.0]
    );
}

fn to_clip(m: [[f32; 4]; 4], [x, y]: [f32; 2]) -> [f32; 2] {
    [
        m[0][0] * x + m[1][0] * y + m[3][0],
        m[0][1] * x + m[1][1] * y + m[3][1],
    ]
}

#[test]
fn pending_resize_projects_with_live_size_but_keeps_layout() {
    let params = Parameters::default();
    let start = viewport(1920.0, 1080.0);
    let mut scene = Scene::compose(
        start,
        [2048.0, 1024.0],
        Some(AnimationNode::idle("idle", start)),
        &params,
    );

    let mut scheduler = FakeScheduler::default();
    let mut debouncer = ResizeDebouncer::default();
    let live = viewport(1080.0, 1920.0);
    debouncer.on_resize(live, &mut scheduler);
    assert!(debouncer.is_pending());

    // The canvas already has its new size, so stage pixels map 1:1 onto it.
    let projection = pixel_projection(live);
    let corner = to_clip(projection, [1080.0, 1920.0]);
    assert!((corner[0] - 1.0).abs() < 1.0e-5);
    assert!((corner[1] + 1.0).abs() < 1.0e-5);

    // The old backdrop overhangs to the right instead of being squashed.
    let backdrop_corner = to_clip(projection, scene.backdrop.rect().max());
    assert!(backdrop_corner[0] > 1.0);

    // Layout waits for the timer.
    assert_eq!(scene.viewport, start);
    assert_eq!(scene.container.background.position, [960.0, 1080.0]);

    scene.apply_resize(debouncer.fire().unwrap());
    assert_eq!(scene.viewport, live);
    assert_eq!(scene.container.background.position, [540.0, 1920.0]);
}
