use super::*;
use crate::foundation::core::PixelsType;
use crate::quantum::QuantumFamily;
use crate::settings::model::{ChannelBinding, QuantumDef, RenderingDef};
use crate::settings::stats::ChannelStats;
use crate::source::InMemoryVolume;

fn dims() -> PixelsDimensions {
    PixelsDimensions {
        size_x: 4,
        size_y: 2,
        size_z: 3,
        size_c: 3,
        size_t: 1,
    }
}

/// Volume where channel `c` holds the constant value `40 + 80 * c` (40, 120,
/// 200), so identity quantization makes per-channel contributions easy to
/// predict and two channels can overflow a band.
fn volume() -> InMemoryVolume {
    let d = dims();
    let plane = (d.size_x * d.size_y * d.size_z) as usize;
    let mut samples = Vec::new();
    for c in 0..d.size_c {
        samples.extend(std::iter::repeat_n(f64::from(40 + 80 * c), plane));
    }
    InMemoryVolume::new(d, PixelsType::Uint8, samples).unwrap()
}

fn binding(active: bool, rgba: [u8; 4]) -> ChannelBinding {
    ChannelBinding {
        active,
        input_start: 0.0,
        input_end: 255.0,
        rgba,
        family: QuantumFamily::Linear,
        coefficient: 1.0,
        noise_reduction: true,
        stats: ChannelStats {
            global_min: 0.0,
            global_max: 255.0,
            histogram: None,
        },
    }
}

/// Identity setup: linear family over a [0, 255] window into a [0, 255]
/// codomain quantizes every integer sample to itself.
fn fixture(bindings: Vec<ChannelBinding>) -> (RenderingDef, QuantumManager, CodomainChain) {
    let def = RenderingDef {
        quantum: QuantumDef::default(),
        channels: bindings,
        default_z: 0,
        default_t: 0,
        model: RenderingModel::GreyScale,
        codomain: vec![],
    };
    let mut quantum = QuantumManager::new();
    quantum
        .set_strategy(&def.quantum, PixelsType::Uint8, &def.channels)
        .unwrap();
    let chain = CodomainChain::new(0, 255);
    (def, quantum, chain)
}

fn render(
    strategy: RenderingStrategy,
    bindings: Vec<ChannelBinding>,
    plane: PlaneDef,
) -> PlaneImage {
    let (def, quantum, chain) = fixture(bindings);
    let vol = volume();
    let ctx = RenderContext {
        def: &def,
        quantum: &quantum,
        chain: &chain,
        source: &vol,
        dims: dims(),
        plane,
    };
    strategy.render(&ctx).unwrap()
}

#[test]
fn axis_sizes_differ_between_strategies_for_non_xy_slices() {
    let d = dims();
    let xy = PlaneDef::Xy { z: 0, t: 0 };
    let xz = PlaneDef::Xz { y: 0, t: 0 };
    let yz = PlaneDef::Yz { x: 0, t: 0 };

    assert_eq!(RenderingStrategy::Rgb.plane_size(xy, d), (4, 2));
    assert_eq!(RenderingStrategy::GreyScale.plane_size(xy, d), (4, 2));

    assert_eq!(RenderingStrategy::Rgb.plane_size(xz, d), (4, 3));
    assert_eq!(RenderingStrategy::GreyScale.plane_size(xz, d), (3, 4));

    assert_eq!(RenderingStrategy::Rgb.plane_size(yz, d), (2, 3));
    assert_eq!(RenderingStrategy::GreyScale.plane_size(yz, d), (3, 2));
}

#[test]
fn image_size_counts_bands() {
    let d = dims();
    let xy = PlaneDef::Xy { z: 0, t: 0 };
    assert_eq!(RenderingStrategy::GreyScale.image_size(xy, d), 8);
    assert_eq!(RenderingStrategy::Rgb.image_size(xy, d), 24);
}

#[test]
fn grey_scale_renders_only_the_first_active_channel() {
    let first_active = render(
        RenderingStrategy::GreyScale,
        vec![
            binding(false, [255, 255, 255, 255]),
            binding(true, [255, 255, 255, 255]),
            binding(true, [255, 255, 255, 255]),
        ],
        PlaneDef::Xy { z: 0, t: 0 },
    );
    let alone = render(
        RenderingStrategy::GreyScale,
        vec![
            binding(false, [255, 255, 255, 255]),
            binding(true, [255, 255, 255, 255]),
            binding(false, [255, 255, 255, 255]),
        ],
        PlaneDef::Xy { z: 0, t: 0 },
    );
    assert_eq!(first_active, alone);
    // channel 1 holds constant 120
    assert!(first_active.grey().unwrap().iter().all(|&v| v == 120));
}

#[test]
fn grey_scale_with_no_active_channel_stays_zeroed() {
    let img = render(
        RenderingStrategy::GreyScale,
        vec![
            binding(false, [255, 255, 255, 255]),
            binding(false, [255, 255, 255, 255]),
            binding(false, [255, 255, 255, 255]),
        ],
        PlaneDef::Xy { z: 0, t: 0 },
    );
    assert!(img.grey().unwrap().iter().all(|&v| v == 0));
}

#[test]
fn grey_scale_transposes_non_xy_slices() {
    let img = render(
        RenderingStrategy::GreyScale,
        vec![
            binding(true, [255, 255, 255, 255]),
            binding(false, [255, 255, 255, 255]),
            binding(false, [255, 255, 255, 255]),
        ],
        PlaneDef::Xz { y: 1, t: 0 },
    );
    assert_eq!((img.width(), img.height()), (3, 4));
    assert!(img.grey().unwrap().iter().all(|&v| v == 40));
}

#[test]
fn rgb_additivity_with_disjoint_colors_at_full_alpha() {
    let xy = PlaneDef::Xy { z: 0, t: 0 };
    let both = render(
        RenderingStrategy::Rgb,
        vec![
            binding(true, [255, 0, 0, 255]),
            binding(true, [0, 255, 0, 255]),
            binding(false, [0, 0, 255, 255]),
        ],
        xy,
    );
    let red_alone = render(
        RenderingStrategy::Rgb,
        vec![
            binding(true, [255, 0, 0, 255]),
            binding(false, [0, 255, 0, 255]),
            binding(false, [0, 0, 255, 255]),
        ],
        xy,
    );
    let green_alone = render(
        RenderingStrategy::Rgb,
        vec![
            binding(false, [255, 0, 0, 255]),
            binding(true, [0, 255, 0, 255]),
            binding(false, [0, 0, 255, 255]),
        ],
        xy,
    );

    let (br, bg, bb) = both.rgb().unwrap();
    let (rr, rg, rb) = red_alone.rgb().unwrap();
    let (gr, gg, gb) = green_alone.rgb().unwrap();
    for i in 0..br.len() {
        assert_eq!(br[i], rr[i] + gr[i]);
        assert_eq!(bg[i], rg[i] + gg[i]);
        assert_eq!(bb[i], rb[i] + gb[i]);
    }
    // at alpha=255 a 255-color band passes the quantized value through
    assert!(br.iter().all(|&v| v == 40));
    assert!(bg.iter().all(|&v| v == 120));
    assert!(bb.iter().all(|&v| v == 0));
}

#[test]
fn rgb_accumulation_wraps_instead_of_clamping() {
    // channels 1 and 2 hold 120 and 200; both fully red the sum is 320,
    // which wraps to 64 in the u8 band
    let img = render(
        RenderingStrategy::Rgb,
        vec![
            binding(false, [255, 0, 0, 255]),
            binding(true, [255, 0, 0, 255]),
            binding(true, [255, 0, 0, 255]),
        ],
        PlaneDef::Xy { z: 0, t: 0 },
    );
    let (r, _, _) = img.rgb().unwrap();
    assert!(r.iter().all(|&v| v == 64));
}

#[test]
fn rgb_alpha_scales_contributions_with_truncation() {
    // alpha 128 on a 255 band: (255 * 120 * 128) / (255 * 255) = 60 (trunc)
    let img = render(
        RenderingStrategy::Rgb,
        vec![
            binding(false, [255, 0, 0, 255]),
            binding(true, [255, 0, 0, 128]),
            binding(false, [255, 0, 0, 255]),
        ],
        PlaneDef::Xy { z: 0, t: 0 },
    );
    let (r, g, b) = img.rgb().unwrap();
    assert!(r.iter().all(|&v| v == 60));
    assert!(g.iter().all(|&v| v == 0));
    assert!(b.iter().all(|&v| v == 0));
}

#[test]
fn data_access_failures_propagate() {
    struct Failing;
    impl crate::source::PlaneSource for Failing {
        fn fetch_plane(
            &self,
            _plane: PlaneDef,
            _channel: usize,
            _width: u32,
            _height: u32,
        ) -> crate::LumiplaneResult<crate::source::Plane2D> {
            Err(crate::LumiplaneError::data_access("backing store offline"))
        }
    }

    let (def, quantum, chain) = fixture(vec![
        binding(true, [255, 255, 255, 255]),
        binding(false, [255, 255, 255, 255]),
        binding(false, [255, 255, 255, 255]),
    ]);
    let ctx = RenderContext {
        def: &def,
        quantum: &quantum,
        chain: &chain,
        source: &Failing,
        dims: dims(),
        plane: PlaneDef::Xy { z: 0, t: 0 },
    };
    let err = RenderingStrategy::GreyScale.render(&ctx).unwrap_err();
    assert!(err.to_string().contains("backing store offline"));
}
