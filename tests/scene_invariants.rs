//! Structural invariants of composed scenes.
//!
//! Every scene the composer accepts must stay inside the unit square, tile
//! its row area with contiguous bands, and be a pure function of its inputs.
//! Checked over every preset and row count, then over randomized profiles.

use proptest::prelude::*;
use vslayout::*;

const EPS: f64 = 1e-9;

fn input_with_rows(n: usize) -> CompositionInput {
    (0..n).fold(
        CompositionInput::new("Left", "Right")
            .images(ImageHandle::new("left.png"), ImageHandle::new("right.png")),
        |input, i| input.row(format!("label {i}"), format!("{i}"), format!("{}", i * 2)),
    )
}

fn in_unit(v: f64) -> bool {
    (-EPS..=1.0 + EPS).contains(&v)
}

/// Every invariant a successful scene must hold. Returns a description of
/// the first violation.
fn check_scene(scene: &Scene, profile: &GeometryProfile) -> Result<(), String> {
    for node in scene {
        let e = node.extent();
        if !(in_unit(e.x) && in_unit(e.y) && in_unit(e.right()) && in_unit(e.top())) {
            return Err(format!("node outside unit square: {node:?}"));
        }
        if e.width < 0.0 || e.height < 0.0 {
            return Err(format!("negative extent: {node:?}"));
        }
    }

    let frame = scene.framed_box().ok_or("missing framed box")?;
    let slots: Vec<_> = scene.image_slots().collect();
    if slots.len() != 2 {
        return Err(format!("expected 2 image slots, got {}", slots.len()));
    }
    for slot in &slots {
        if (slot.region.width - slot.region.height).abs() > EPS {
            return Err(format!("slot not square: {:?}", slot.region));
        }
    }
    if slots[0].region.right() > slots[1].region.x + EPS {
        return Err("image slots overlap".into());
    }

    let bands = scene.bands();
    if bands.len() != profile.row_count {
        return Err(format!("{} bands for {} rows", bands.len(), profile.row_count));
    }
    let header = scene
        .divider(DividerRole::Header)
        .ok_or("missing header divider")?;
    if bands[0].top != header.y {
        return Err(format!("first band starts at {} not {}", bands[0].top, header.y));
    }
    let content_bottom = frame.region.y + profile.content_padding;
    let last = bands[bands.len() - 1];
    if (last.bottom - content_bottom).abs() > EPS {
        return Err(format!("last band ends at {} not {content_bottom}", last.bottom));
    }
    for pair in bands.windows(2) {
        if pair[0].bottom != pair[1].top {
            return Err(format!("bands not contiguous: {pair:?}"));
        }
    }
    for band in bands {
        if band.height() <= 0.0 {
            return Err(format!("empty band: {band:?}"));
        }
    }

    for (i, band) in bands.iter().enumerate() {
        let label = scene
            .text(TextRole::RowLabel(i))
            .ok_or_else(|| format!("missing label {i}"))?;
        if (label.y - band.center()).abs() > EPS {
            return Err(format!("label {i} not centered in its band"));
        }
        let expect_divider = i + 1 < bands.len();
        if scene.divider(DividerRole::BetweenRows(i)).is_some() != expect_divider {
            return Err(format!("row divider {i} presence wrong"));
        }
    }

    let names = [Side::Left, Side::Right].map(|s| scene.text(TextRole::Name(s)));
    let vs = scene.text(TextRole::VsMarker).ok_or("missing VS marker")?;
    for name in names {
        let name = name.ok_or("missing name")?;
        if name.y != vs.y {
            return Err("names and VS marker on different baselines".into());
        }
        if name.y <= header.y {
            return Err("name below header divider".into());
        }
    }
    Ok(())
}

#[test]
fn every_preset_and_row_count() {
    for preset in Preset::ALL {
        for rows in 1..=10 {
            let profile = preset.profile().with_row_count(rows);
            let scene = compose(&input_with_rows(rows), &profile)
                .unwrap_or_else(|e| panic!("{preset} with {rows} rows: {e}"));
            if let Err(msg) = check_scene(&scene, &profile) {
                panic!("{preset} with {rows} rows: {msg}");
            }
            assert_eq!(scene.len(), 7 + rows * 4 - 1, "{preset} with {rows} rows");
            assert_eq!(scene.style(), profile.render_style);
        }
    }
}

#[test]
fn composing_twice_is_identical() {
    let profile = GeometryProfile::wide().with_row_count(4);
    let input = input_with_rows(4);
    assert_eq!(
        compose(&input, &profile).unwrap(),
        compose(&input, &profile).unwrap()
    );
}

#[test]
fn more_rows_than_configured_is_rejected() {
    let err = compose(&input_with_rows(4), &GeometryProfile::default().with_row_count(3))
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::ConfigurationMismatch {
            expected: 3,
            actual: 4
        }
    );
}

#[test]
fn huge_configured_row_count_is_a_mismatch() {
    let profile = GeometryProfile::default().with_row_count(usize::MAX / 8);
    let err = compose(&input_with_rows(1), &profile).unwrap_err();
    assert_eq!(
        err,
        LayoutError::ConfigurationMismatch {
            expected: usize::MAX / 8,
            actual: 1
        }
    );
}

#[test]
fn huge_parsed_row_count_is_a_mismatch() {
    let parsed = profile::parse("rows=4000000000");
    assert!(parsed.warnings.is_empty());
    let err = compose(&input_with_rows(3), &parsed.profile).unwrap_err();
    assert!(
        matches!(err, LayoutError::ConfigurationMismatch { actual: 3, .. }),
        "{err:?}"
    );
}

#[test]
fn two_row_scenario() {
    let input = CompositionInput::new("A", "B")
        .images(ImageHandle::new("a.png"), ImageHandle::new("b.png"))
        .row("Age", "23", "7")
        .row("Worth", "460k", "1");
    let scene = compose(&input, &GeometryProfile::default().with_row_count(2)).unwrap();

    let texts: Vec<_> = scene.texts().collect();
    let count = |f: fn(&TextRole) -> bool| texts.iter().filter(|t| f(&t.role)).count();
    assert_eq!(scene.image_slots().count(), 2);
    assert_eq!(count(|r| matches!(r, TextRole::Name(_))), 2);
    assert_eq!(count(|r| matches!(r, TextRole::VsMarker)), 1);
    assert_eq!(
        count(|r| matches!(r, TextRole::RowLabel(_) | TextRole::RowValue(..))),
        6
    );
    assert_eq!(scene.dividers().count(), 2);
    assert!(scene.divider(DividerRole::BetweenRows(0)).is_some());
    assert_eq!(scene.text(TextRole::RowValue(1, Side::Right)).unwrap().content, "1");
}

#[test]
fn placeholder_and_photo_handles_lay_out_identically() {
    let profile = GeometryProfile::classic();
    let photo = input_with_rows(3);
    let placeholder = input_with_rows(3).images(
        ImageHandle::new("placeholder.png"),
        ImageHandle::new("placeholder.png"),
    );
    let a = compose(&photo, &profile).unwrap();
    let b = compose(&placeholder, &profile).unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        match (x, y) {
            (LayoutNode::ImageSlot(x), LayoutNode::ImageSlot(y)) => {
                assert_eq!(x.region, y.region);
                assert_eq!(x.side, y.side);
            }
            _ => assert_eq!(x, y),
        }
    }
}

#[test]
fn empty_handles_are_accepted() {
    let input = CompositionInput::new("", "").row("", "", "");
    let scene = compose(&input, &GeometryProfile::default().with_row_count(1)).unwrap();
    assert!(scene.image_slots().all(|s| s.handle.as_str().is_empty()));
}

#[test]
fn parsed_profiles_compose() {
    for query in [
        "preset=table&rows=5",
        "preset=wide&gap=0.02&rows=2",
        "placement=edge&kw=0.3&rows=1",
        "margin=0.02&padding=0.02&image=0.4&rows=6",
    ] {
        let parsed = profile::parse(query);
        assert!(parsed.warnings.is_empty(), "{query}: {:?}", parsed.warnings);
        let rows = parsed.profile.row_count;
        let scene = compose(&input_with_rows(rows), &parsed.profile)
            .unwrap_or_else(|e| panic!("{query}: {e}"));
        if let Err(msg) = check_scene(&scene, &parsed.profile) {
            panic!("{query}: {msg}");
        }
    }
}

fn placement() -> impl Strategy<Value = ImagePlacementMode> {
    prop_oneof![
        Just(ImagePlacementMode::Quartiles),
        (0.0..0.1f64).prop_map(|gap| ImagePlacementMode::EdgeToEdge { gap }),
    ]
}

/// Profiles inside the region where every combination fits.
fn fitting_profile() -> impl Strategy<Value = GeometryProfile> {
    (
        0.0..0.1f64,
        0.0..0.08f64,
        0.2..0.45f64,
        0.2..0.4f64,
        0.5..0.8f64,
        placement(),
        1usize..=10,
    )
        .prop_map(|(margin, padding, image, kw, kh, placement, rows)| {
            GeometryProfile::default()
                .with_outer_margin(margin)
                .with_content_padding(padding)
                .with_image_area_fraction(image)
                .with_slot_factors(kw, kh)
                .with_placement(placement)
                .with_row_count(rows)
        })
}

/// Profiles anywhere in the accepted parameter ranges.
fn any_profile() -> impl Strategy<Value = GeometryProfile> {
    (
        0.0..=0.45f64,
        0.0..=0.45f64,
        0.05..=0.95f64,
        0.05..=1.0f64,
        0.05..=1.0f64,
        prop_oneof![
            Just(ImagePlacementMode::Quartiles),
            (0.0..=0.9f64).prop_map(|gap| ImagePlacementMode::EdgeToEdge { gap }),
        ],
        1usize..=10,
    )
        .prop_map(|(margin, padding, image, kw, kh, placement, rows)| {
            GeometryProfile::default()
                .with_outer_margin(margin)
                .with_content_padding(padding)
                .with_image_area_fraction(image)
                .with_slot_factors(kw, kh)
                .with_placement(placement)
                .with_row_count(rows)
        })
}

proptest! {
    #[test]
    fn fitting_profiles_always_compose(profile in fitting_profile()) {
        let rows = profile.row_count;
        let scene = compose(&input_with_rows(rows), &profile);
        prop_assert!(scene.is_ok(), "{:?}", scene);
        let scene = scene.unwrap();
        prop_assert_eq!(check_scene(&scene, &profile), Ok(()));
    }

    #[test]
    fn accepted_scenes_hold_invariants(profile in any_profile()) {
        let rows = profile.row_count;
        match compose(&input_with_rows(rows), &profile) {
            Ok(scene) => prop_assert_eq!(check_scene(&scene, &profile), Ok(())),
            Err(LayoutError::InvalidGeometry(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn wrong_row_count_is_always_mismatch(rows in 1usize..=10, extra in 1usize..=3) {
        let profile = GeometryProfile::default().with_row_count(rows);
        let err = compose(&input_with_rows(rows + extra), &profile).unwrap_err();
        prop_assert_eq!(
            err,
            LayoutError::ConfigurationMismatch { expected: rows, actual: rows + extra }
        );
    }
}
