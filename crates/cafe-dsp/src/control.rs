//! Cross-thread parameter control for a running [`Pipeline`](crate::Pipeline).
//!
//! The UI thread owns a [`ParameterHandle`]; the audio thread owns the
//! pipeline. Every change is published as a complete [`Parameters`] snapshot
//! into a one-slot channel. The pipeline drains that slot without blocking at
//! the start of each buffer, so a buffer never sees a half-applied update.

use cafe_core::Parameters;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

/// Create a linked snapshot slot seeded with `initial`
pub(crate) fn snapshot_channel(initial: Parameters) -> (ParameterHandle, Receiver<Parameters>) {
    let (tx, rx) = bounded(1);
    let handle = ParameterHandle {
        params: initial,
        tx,
        stale_rx: rx.clone(),
    };
    (handle, rx)
}

/// Control-side handle for publishing parameter changes to the audio thread
///
/// Setters never block. If the audio thread has not yet picked up the
/// previous snapshot, it is replaced by the newer one. Snapshots carry every
/// parameter, so once a handle exists it is the only writer the pipeline
/// listens to; local setters on the pipeline are overwritten by the next
/// publish.
pub struct ParameterHandle {
    /// Local copy of the last published parameters
    params: Parameters,
    tx: Sender<Parameters>,
    /// Used only to evict a snapshot the pipeline has not consumed yet
    stale_rx: Receiver<Parameters>,
}

impl ParameterHandle {
    /// Parameters as last published by this handle
    pub fn parameters(&self) -> Parameters {
        self.params
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.params.set_intensity(intensity);
        self.publish();
    }

    pub fn set_spatial_width(&mut self, spatial_width: f32) {
        self.params.set_spatial_width(spatial_width);
        self.publish();
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        self.params.set_room_size(room_size);
        self.publish();
    }

    /// Update all parameters in one snapshot
    ///
    /// `None` for the room size restores the default room.
    pub fn update_parameters(
        &mut self,
        intensity: f32,
        spatial_width: f32,
        room_size: Option<f32>,
    ) {
        self.params.update(
            intensity,
            spatial_width,
            room_size.unwrap_or(cafe_core::DEFAULT_ROOM_SIZE),
        );
        self.publish();
    }

    /// Replace the parameters wholesale
    pub fn set_parameters(&mut self, params: Parameters) {
        self.params = params;
        self.publish();
    }

    fn publish(&self) {
        loop {
            match self.tx.try_send(self.params) {
                Ok(()) => break,
                Err(TrySendError::Full(_)) => match self.stale_rx.try_recv() {
                    // Evicted the stale snapshot, or the pipeline just took it
                    Ok(_) | Err(TryRecvError::Empty) => continue,
                    Err(TryRecvError::Disconnected) => break,
                },
                Err(TrySendError::Disconnected(_)) => break,
            }
        }

        tracing::debug!(
            "Published parameters: intensity={:.2}, width={:.2}, room_size={:.2}, distance={:.2}",
            self.params.intensity(),
            self.params.spatial_width(),
            self.params.room_size(),
            self.params.distance()
        );
    }
}
