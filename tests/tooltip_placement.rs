use rand::{Rng, SeedableRng, rngs::StdRng};

use term_rview::components::tooltip::{clamp_to_screen, connector_dx, place_tooltip};
use term_rview::constants::{TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y};
use term_rview::geometry::{Point, PxRect, Size};

fn random_screen(rng: &mut StdRng) -> PxRect {
    PxRect::new(
        rng.gen_range(-4000..4000),
        rng.gen_range(-2000..2000),
        rng.gen_range(640..3840),
        rng.gen_range(480..2160),
    )
}

#[test]
fn clamped_anchor_keeps_fitting_panels_on_screen() {
    let mut rng = StdRng::seed_from_u64(0x7007_1ee7);
    for _ in 0..2000 {
        let screen = random_screen(&mut rng);
        let size = Size::new(
            rng.gen_range(40..=screen.width),
            rng.gen_range(40..=screen.height),
        );
        let anchor = Point::new(
            rng.gen_range(screen.x - 500..screen.right() + 500),
            rng.gen_range(screen.y - 500..screen.bottom() + 500),
        );
        let p = clamp_to_screen(anchor, size, screen);
        let panel = PxRect::from_origin_size(p, size);
        assert!(
            screen.contains_rect(&panel),
            "panel {panel:?} escapes {screen:?} for anchor {anchor:?}"
        );
    }
}

#[test]
fn displayed_position_is_clamped_anchor_plus_fixed_offset() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let screen = random_screen(&mut rng);
        let size = Size::new(rng.gen_range(40..400), rng.gen_range(40..200));
        let anchor = Point::new(
            rng.gen_range(screen.x..screen.right()),
            rng.gen_range(screen.y..screen.bottom()),
        );
        let clamped = clamp_to_screen(anchor, size, screen);
        assert_eq!(
            place_tooltip(anchor, size, screen),
            clamped.offset(TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y)
        );
    }
}

#[test]
fn anchor_well_inside_is_left_alone() {
    let screen = PxRect::new(0, 0, 1920, 1080);
    let anchor = Point::new(300, 200);
    assert_eq!(clamp_to_screen(anchor, Size::new(320, 110), screen), anchor);
}

#[test]
fn notch_only_for_close_horizontal_alignment() {
    assert_eq!(connector_dx(100, 100), Some(0));
    assert_eq!(connector_dx(104, 100), Some(4));
    assert_eq!(connector_dx(99, 100), None);
    assert_eq!(connector_dx(110, 100), None);
}
