//! Map surface and flow-layer seams.
//!
//! Tile fetching and particle animation belong to external engines. These
//! types model exactly the surface this pipeline touches: a map that accepts
//! layers, and a renderer that turns a tagged payload plus a style bundle
//! into an attachable layer.

use tracing::{debug, info};
use wind_common::{VelocityStyle, WindPayload};

use crate::config::MapConfig;

/// The mutable map surface layers attach to.
///
/// Stands in for the external tile-map engine: it records the tile source it
/// was created with and the layers added to it. This pipeline adds layers
/// exactly once and never removes them.
#[derive(Debug)]
pub struct MapSurface {
    tile_url: String,
    attribution: String,
    layers: Vec<String>,
}

impl MapSurface {
    pub fn new(config: &MapConfig) -> Self {
        info!(
            tile_url = %config.tile_url,
            min_zoom = config.min_zoom,
            max_zoom = config.max_zoom,
            tile_size = config.tile_size,
            center_lat = config.center[0],
            center_lon = config.center[1],
            zoom = config.zoom,
            "Map surface initialized"
        );
        Self {
            tile_url: config.resolved_tile_url(),
            attribution: config.attribution.clone(),
            layers: Vec::new(),
        }
    }

    /// Register a named layer.
    pub fn attach(&mut self, name: &str) {
        debug!(layer = name, "Layer attached");
        self.layers.push(name.to_string());
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_names(&self) -> &[String] {
        &self.layers
    }

    pub fn tile_url(&self) -> &str {
        &self.tile_url
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }
}

/// A layer that can attach itself to a map surface.
pub trait FlowLayer {
    fn name(&self) -> &str;
    fn add_to(&self, surface: &mut MapSurface);
}

/// Builds a flow layer from a tagged wind payload and a style bundle.
pub trait FlowRenderer {
    fn build_layer(&self, payload: WindPayload, style: &VelocityStyle) -> Box<dyn FlowLayer>;
}

/// Default renderer: wraps the payload in a particle-velocity layer handle
/// for the external animation engine.
#[derive(Debug, Default)]
pub struct ParticleFlowRenderer;

impl FlowRenderer for ParticleFlowRenderer {
    fn build_layer(&self, payload: WindPayload, style: &VelocityStyle) -> Box<dyn FlowLayer> {
        let (u_min, u_max) = sample_range(&payload.u.data);
        let (v_min, v_max) = sample_range(&payload.v.data);

        info!(
            nx = payload.u.header.nx,
            ny = payload.u.header.ny,
            u_min,
            u_max,
            v_min,
            v_max,
            max_velocity = style.max_velocity,
            particles = style.particle_multiplier,
            "Built velocity layer"
        );

        Box::new(VelocityLayer {
            payload,
            style: style.clone(),
        })
    }
}

/// Handle for the particle-animation layer.
pub struct VelocityLayer {
    payload: WindPayload,
    style: VelocityStyle,
}

impl VelocityLayer {
    pub fn payload(&self) -> &WindPayload {
        &self.payload
    }

    pub fn style(&self) -> &VelocityStyle {
        &self.style
    }
}

impl FlowLayer for VelocityLayer {
    fn name(&self) -> &str {
        "wind-velocity"
    }

    fn add_to(&self, surface: &mut MapSurface) {
        info!(
            nx = self.payload.u.header.nx,
            ny = self.payload.u.header.ny,
            colors = self.style.color_scale.len(),
            "Adding velocity layer to map"
        );
        surface.attach(self.name());
    }
}

/// Min/max over the samples, ignoring NaN.
fn sample_range(data: &[f64]) -> (f64, f64) {
    data.iter()
        .filter(|v| !v.is_nan())
        .fold((f64::MAX, f64::MIN), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use wind_common::{GridComponent, GridHeader};

    fn payload() -> WindPayload {
        let header = GridHeader {
            nx: 2,
            ny: 2,
            parameter_number: 0,
            extra: Map::new(),
        };
        WindPayload {
            u: GridComponent {
                header: header.clone(),
                data: vec![1.0, 0.0, -1.0, 2.0],
            },
            v: GridComponent {
                header,
                data: vec![0.0, 1.0, 1.0, -2.0],
            },
        }
    }

    #[test]
    fn test_velocity_layer_attaches_once() {
        let renderer = ParticleFlowRenderer;
        let style = VelocityStyle::default();
        let layer = renderer.build_layer(payload().tagged(), &style);

        let mut surface = MapSurface::new(&MapConfig::default());
        layer.add_to(&mut surface);

        assert_eq!(surface.layer_count(), 1);
        assert_eq!(surface.layer_names(), ["wind-velocity"]);
    }

    #[test]
    fn test_sample_range_skips_nan() {
        let (min, max) = sample_range(&[f64::NAN, -3.0, 7.5]);
        assert_eq!(min, -3.0);
        assert_eq!(max, 7.5);
    }

    #[test]
    fn test_surface_resolves_token() {
        let config = MapConfig {
            tile_url: "https://tiles.example.com/{z}/{x}/{y}?access_token={accessToken}"
                .to_string(),
            access_token: "pk.token".to_string(),
            ..Default::default()
        };
        let surface = MapSurface::new(&config);
        assert!(surface.tile_url().ends_with("access_token=pk.token"));
        assert_eq!(surface.layer_count(), 0);
    }
}
