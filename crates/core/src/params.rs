use serde::{Deserialize, Serialize};

/// Lower bound of the simulated listener distance in meters
pub const MIN_DISTANCE: f32 = 3.0;
/// Distance added per unit of intensity (3 m at 0.0, 10 m at 1.0)
pub const DISTANCE_SPAN: f32 = 7.0;

pub const DEFAULT_INTENSITY: f32 = 0.5;
pub const DEFAULT_SPATIAL_WIDTH: f32 = 0.5;
pub const DEFAULT_ROOM_SIZE: f32 = 0.3;

pub const MIN_ROOM_SIZE: f32 = 0.1;

/// User-tunable café mode parameters
///
/// `distance` is always derived from `intensity` and has no setter of its own.
/// Every setter clamps into the parameter's domain instead of rejecting values;
/// a NaN input leaves the current value in place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParametersRepr", into = "ParametersRepr")]
pub struct Parameters {
    intensity: f32,
    spatial_width: f32,
    room_size: f32,
    distance: f32,
}

impl Parameters {
    /// Create parameters from raw values, clamping each into range
    pub fn new(intensity: f32, spatial_width: f32, room_size: f32) -> Self {
        let mut params = Self::default();
        params.update(intensity, spatial_width, room_size);
        params
    }

    /// Effect intensity in [0, 1]; also the final output gain
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Stereo width in [0, 1]
    pub fn spatial_width(&self) -> f32 {
        self.spatial_width
    }

    /// Room size in [0.1, 1]; scales the early reflection gains
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Simulated listener distance in meters, in [3, 10]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set intensity and recompute the derived distance
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = clamp_or_keep(self.intensity, intensity, 0.0, 1.0);
        self.distance = MIN_DISTANCE + self.intensity * DISTANCE_SPAN;
    }

    pub fn set_spatial_width(&mut self, spatial_width: f32) {
        self.spatial_width = clamp_or_keep(self.spatial_width, spatial_width, 0.0, 1.0);
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        self.room_size = clamp_or_keep(self.room_size, room_size, MIN_ROOM_SIZE, 1.0);
    }

    /// Set all user parameters at once
    pub fn update(&mut self, intensity: f32, spatial_width: f32, room_size: f32) {
        self.set_intensity(intensity);
        self.set_spatial_width(spatial_width);
        self.set_room_size(room_size);
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            spatial_width: DEFAULT_SPATIAL_WIDTH,
            room_size: DEFAULT_ROOM_SIZE,
            distance: MIN_DISTANCE + DEFAULT_INTENSITY * DISTANCE_SPAN,
        }
    }
}

#[inline]
fn clamp_or_keep(current: f32, value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        current
    } else {
        value.clamp(min, max)
    }
}

/// On-disk shape of [`Parameters`]. Goes through the clamping setters on the
/// way in so a hand-edited file cannot break the distance invariant.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ParametersRepr {
    intensity: f32,
    spatial_width: f32,
    room_size: f32,
}

impl Default for ParametersRepr {
    fn default() -> Self {
        Parameters::default().into()
    }
}

impl From<ParametersRepr> for Parameters {
    fn from(repr: ParametersRepr) -> Self {
        Parameters::new(repr.intensity, repr.spatial_width, repr.room_size)
    }
}

impl From<Parameters> for ParametersRepr {
    fn from(params: Parameters) -> Self {
        Self {
            intensity: params.intensity,
            spatial_width: params.spatial_width,
            room_size: params.room_size,
        }
    }
}
