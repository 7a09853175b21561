use super::*;
use crate::codomain::CodomainContext;
use crate::settings::stats::ChannelStats;

fn dims() -> PixelsDimensions {
    PixelsDimensions {
        size_x: 8,
        size_y: 8,
        size_z: 4,
        size_c: 2,
        size_t: 3,
    }
}

fn binding() -> ChannelBinding {
    ChannelBinding {
        active: true,
        input_start: 0.0,
        input_end: 100.0,
        rgba: [255, 0, 0, 255],
        family: QuantumFamily::Linear,
        coefficient: 1.0,
        noise_reduction: true,
        stats: ChannelStats {
            global_min: 0.0,
            global_max: 100.0,
            histogram: None,
        },
    }
}

fn def() -> RenderingDef {
    RenderingDef {
        quantum: QuantumDef::default(),
        channels: vec![binding(), binding()],
        default_z: 2,
        default_t: 0,
        model: RenderingModel::GreyScale,
        codomain: vec![],
    }
}

#[test]
fn quantum_def_accepts_only_legal_bit_resolutions() {
    for r in LEGAL_BIT_RESOLUTIONS {
        let d = QuantumDef {
            bit_resolution: r,
            cd_start: 0,
            cd_end: r,
            ..QuantumDef::default()
        };
        assert!(d.validate().is_ok(), "{r}");
    }
    for r in [0, 2, 100, 256, -1] {
        let d = QuantumDef {
            bit_resolution: r,
            ..QuantumDef::default()
        };
        assert!(d.validate().is_err(), "{r}");
    }
}

#[test]
fn quantum_def_rejects_bad_codomain_or_coefficient() {
    let d = QuantumDef {
        cd_start: 100,
        cd_end: 50,
        ..QuantumDef::default()
    };
    assert!(d.validate().is_err());

    let d = QuantumDef {
        cd_end: 300,
        ..QuantumDef::default()
    };
    assert!(d.validate().is_err());

    let d = QuantumDef {
        coefficient: 0.0,
        ..QuantumDef::default()
    };
    assert!(d.validate().is_err());
}

#[test]
fn rendering_def_checks_channel_count_and_defaults() {
    assert!(def().validate(dims()).is_ok());

    let mut d = def();
    d.channels.pop();
    assert!(d.validate(dims()).is_err());

    let mut d = def();
    d.default_z = 4;
    assert!(d.validate(dims()).is_err());

    let mut d = def();
    d.default_t = 3;
    assert!(d.validate(dims()).is_err());
}

#[test]
fn rendering_def_rejects_inverted_channel_window() {
    let mut d = def();
    d.channels[1].input_start = 200.0;
    assert!(d.validate(dims()).is_err());
}

#[test]
fn settings_round_trip_as_json() {
    let mut d = def();
    d.model = RenderingModel::Rgb;
    d.codomain = vec![
        CodomainContext::reverse_intensity(0, 255).unwrap(),
        CodomainContext::plane_slicing(0, 255, 5, 2, 250, true).unwrap(),
    ];
    d.channels[1].family = QuantumFamily::Exponential;
    d.channels[1].coefficient = 1.4;

    let json = d.to_json().unwrap();
    let back = RenderingDef::from_json(&json).unwrap();
    assert_eq!(back, d);
    back.validate(dims()).unwrap();
}

#[test]
fn from_json_rejects_garbage() {
    assert!(RenderingDef::from_json("{not json").is_err());
    assert!(RenderingDef::from_json("{}").is_err());
}
