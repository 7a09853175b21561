use super::*;
use crate::source::InMemoryVolume;

fn dims() -> PixelsDimensions {
    PixelsDimensions {
        size_x: 4,
        size_y: 4,
        size_z: 5,
        size_c: 2,
        size_t: 2,
    }
}

/// Channel 0 ramps 0..=255 across each plane; channel 1 is constant 200.
fn volume() -> InMemoryVolume {
    let d = dims();
    let plane = (d.size_x * d.size_y) as usize;
    let mut samples = Vec::new();
    for _t in 0..d.size_t {
        for c in 0..d.size_c {
            for _z in 0..d.size_z {
                for i in 0..plane {
                    samples.push(if c == 0 {
                        (i * 255 / (plane - 1)) as f64
                    } else {
                        200.0
                    });
                }
            }
        }
    }
    InMemoryVolume::new(d, PixelsType::Uint8, samples).unwrap()
}

fn renderer() -> Renderer {
    let vol = Arc::new(volume());
    Renderer::initialize(vol.clone(), vol.as_ref(), None).unwrap()
}

#[test]
fn defaults_are_grey_scale_with_first_channel_active() {
    let r = renderer();
    let def = r.rendering_def();
    assert_eq!(def.model, RenderingModel::GreyScale);
    assert!(def.channels[0].active);
    assert!(!def.channels[1].active);
    assert_eq!(def.default_z, dims().size_z / 2);
    assert_eq!(def.default_t, 0);
    for binding in &def.channels {
        assert_eq!(binding.family, QuantumFamily::Linear);
        assert!(binding.input_start < binding.input_end);
    }
}

#[test]
fn saved_settings_must_match_the_pixel_set() {
    let vol = Arc::new(volume());
    let mut def = renderer().rendering_def().clone();
    def.channels.pop();
    assert!(Renderer::initialize(vol.clone(), vol.as_ref(), Some(def)).is_err());
}

#[test]
fn render_validates_plane_indices() {
    let r = renderer();
    assert!(r.render(PlaneDef::Xy { z: 5, t: 0 }).is_err());
    assert!(r.render(PlaneDef::Xy { z: 0, t: 2 }).is_err());
    assert!(r.render(PlaneDef::Xy { z: 4, t: 1 }).is_ok());
}

#[test]
fn model_swap_changes_the_raster_shape() {
    let mut r = renderer();
    let xy = PlaneDef::Xy { z: 0, t: 0 };
    assert_eq!(r.render(xy).unwrap().band_count(), 1);
    assert_eq!(r.image_size(xy).unwrap(), 16);

    r.set_model(RenderingModel::Rgb);
    assert_eq!(r.render(xy).unwrap().band_count(), 3);
    assert_eq!(r.image_size(xy).unwrap(), 48);
}

#[test]
fn window_round_trips_through_the_renderer() {
    let mut r = renderer();
    r.set_channel_window(0, 10.0, 90.0).unwrap();
    assert_eq!(r.channel_window(0).unwrap(), (10.0, 90.0));
    assert_eq!(r.rendering_def().channels[0].input_start, 10.0);
    assert_eq!(r.rendering_def().channels[0].input_end, 90.0);
}

#[test]
fn bit_resolution_change_resets_the_codomain() {
    let mut r = renderer();
    r.add_codomain_context(CodomainContext::reverse_intensity(0, 255).unwrap())
        .unwrap();
    r.set_bit_resolution(31).unwrap();

    let def = r.rendering_def();
    assert_eq!(def.quantum.bit_resolution, 31);
    assert_eq!((def.quantum.cd_start, def.quantum.cd_end), (0, 31));
    // the chain context was rebound too
    match def.codomain[0] {
        CodomainContext::ReverseIntensity { cd_start, cd_end } => {
            assert_eq!((cd_start, cd_end), (0, 31));
        }
        _ => unreachable!(),
    }
    assert!(r.set_bit_resolution(100).is_err());
}

#[test]
fn reverse_intensity_inverts_the_rendered_plane() {
    let mut r = renderer();
    r.set_channel_window(0, 0.0, 255.0).unwrap();
    let plain = r.render(PlaneDef::Xy { z: 0, t: 0 }).unwrap();

    r.add_codomain_context(CodomainContext::reverse_intensity(0, 255).unwrap())
        .unwrap();
    let reversed = r.render(PlaneDef::Xy { z: 0, t: 0 }).unwrap();

    let plain = plain.grey().unwrap();
    let reversed = reversed.grey().unwrap();
    for i in 0..plain.len() {
        assert_eq!(u32::from(plain[i]) + u32::from(reversed[i]), 255);
    }

    let ctx = CodomainContext::reverse_intensity(0, 255).unwrap();
    assert!(r.remove_codomain_context(&ctx));
    assert!(r.rendering_def().codomain.is_empty());
}

#[test]
fn quantization_map_change_preserves_windows() {
    let mut r = renderer();
    r.set_channel_window(0, 20.0, 40.0).unwrap();
    r.set_quantization_map(0, QuantumFamily::Polynomial, 2.0, false)
        .unwrap();
    assert_eq!(r.channel_window(0).unwrap(), (20.0, 40.0));
    assert_eq!(r.rendering_def().channels[0].family, QuantumFamily::Polynomial);
    assert!(!r.rendering_def().channels[0].noise_reduction);
}

#[test]
fn channel_operations_reject_unknown_channels() {
    let mut r = renderer();
    assert!(r.set_active(2, true).is_err());
    assert!(r.set_rgba(9, [1, 2, 3, 4]).is_err());
    assert!(r.set_channel_window(2, 0.0, 1.0).is_err());
    assert!(r.channel_window(2).is_err());
}

#[test]
fn default_plane_setters_validate_bounds() {
    let mut r = renderer();
    r.set_default_z(4).unwrap();
    assert!(r.set_default_z(5).is_err());
    r.set_default_t(1).unwrap();
    assert!(r.set_default_t(2).is_err());
}
