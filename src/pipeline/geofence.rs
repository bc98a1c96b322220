use crate::model::device::Device;
use crate::pipeline::geo;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeofenceOutcome {
    /// Device has no configured zone, or the event carried no coordinate.
    /// The check is opt-in: absence of either input skips it entirely.
    Skipped,
    Inside { distance_m: f64 },
    Outside { distance_m: f64 },
}

/// Enforce the device's permitted zone against a reported coordinate.
/// Distance exactly equal to the radius is still inside.
pub fn check(device: &Device, point: Option<(f64, f64)>) -> GeofenceOutcome {
    let Some((zone_lat, zone_lng, radius_m)) = device.geofence() else {
        return GeofenceOutcome::Skipped;
    };
    let Some((lat, lng)) = point else {
        return GeofenceOutcome::Skipped;
    };

    let distance_m = geo::haversine_meters(lat, lng, zone_lat, zone_lng);
    if distance_m > radius_m {
        GeofenceOutcome::Outside { distance_m }
    } else {
        GeofenceOutcome::Inside { distance_m }
    }
}
