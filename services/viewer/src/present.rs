//! Payload invariant checks and hand-off to the flow renderer.
//!
//! This is the single linear pipeline run once per invocation: fetch,
//! cross-check the grid-length invariant, reject degenerate data, tag the
//! components, and attach the rendered layer to the map.

use tracing::{error, info, warn};
use wind_common::{VelocityStyle, WindError, WindPayload, WindResult};

use crate::fetch::WindFetcher;
use crate::layer::{FlowRenderer, MapSurface};
use crate::notify::AlertSink;

/// Run the load-validate-render pipeline once.
///
/// Fetch failures have already been surfaced by the fetcher and end the run
/// quietly; invariant violations found here fire their own alert.
pub async fn load_wind_data(
    fetcher: &WindFetcher,
    renderer: &dyn FlowRenderer,
    surface: &mut MapSurface,
    style: &VelocityStyle,
    alerts: &dyn AlertSink,
) -> WindResult<()> {
    let (payload, stats) = fetcher.fetch(alerts).await?;

    info!(
        attempts = stats.attempts,
        elapsed_ms = (stats.completed_at - stats.started_at).num_milliseconds(),
        "Wind payload received"
    );

    check_grid_lengths(&payload, alerts)?;
    check_degenerate(&payload, alerts)?;

    let tagged = payload.tagged();
    let layer = renderer.build_layer(tagged, style);
    layer.add_to(surface);

    info!(layers = surface.layer_count(), "Flow layer attached to map");
    Ok(())
}

/// Both components must carry exactly `nx * ny` samples, with the
/// dimensions taken from the U header.
fn check_grid_lengths(payload: &WindPayload, alerts: &dyn AlertSink) -> WindResult<()> {
    let nx = payload.u.header.nx;
    let ny = payload.u.header.ny;
    let expected = payload.u.header.expected_len();

    for (name, component) in [("U", &payload.u), ("V", &payload.v)] {
        let actual = component.data.len();
        if actual != expected {
            error!(
                component = name,
                nx,
                ny,
                expected,
                actual,
                "Grid size does not match header dimensions"
            );
            let err = WindError::GridSizeMismatch {
                component: name,
                nx,
                ny,
                expected,
                actual,
            };
            alerts.alert(&format!("Wind data is inconsistent: {}", err));
            return Err(err);
        }
    }
    Ok(())
}

/// An all-zero field has nothing to animate; treat it as missing data
/// rather than rendering a static map.
fn check_degenerate(payload: &WindPayload, alerts: &dyn AlertSink) -> WindResult<()> {
    if payload.u.is_all_zero() && payload.v.is_all_zero() {
        warn!("Wind payload contains only zero samples, nothing to animate");
        alerts.alert("Wind data contains no meaningful values");
        return Err(WindError::DegenerateData);
    }
    Ok(())
}
