use crate::error::{CaptureError, CaptureResult};
use crate::types::CapturedImage;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Camera preference for a stream request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera, the one pointed at the subject.
    Environment,
    /// Whatever the device offers.
    Any,
}

/// Access to a camera. Implemented over `getUserMedia` in the browser and
/// by fakes in tests.
#[async_trait(?Send)]
pub trait CameraDevice {
    type Stream: Clone;

    async fn request_stream(&self, facing: Facing) -> CaptureResult<Self::Stream>;

    /// Draw the current frame at native resolution and encode it as JPEG.
    async fn grab_frame(&self, stream: &Self::Stream, quality: f64) -> CaptureResult<CapturedImage>;

    /// Stop every track of `stream`.
    fn stop(&self, stream: &Self::Stream);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPhase {
    Closed,
    Opening,
    Live,
}

enum CameraState<S> {
    Closed,
    Opening,
    Live(S),
}

/// Camera session state machine: `Closed -> Opening -> Live -> Closed`.
///
/// The async steps are split into `begin_*`/`finish_*` so that a UI can drop
/// its borrow while the device works; `open` and `capture` chain them for
/// callers that can hold `&mut self` across the await.
pub struct MediaCapture<D: CameraDevice> {
    device: D,
    state: CameraState<D::Stream>,
    quality: f64,
}

impl<D> MediaCapture<D>
where
    D: CameraDevice + Clone,
{
    pub fn new(device: D, quality: f64) -> Self {
        Self {
            device,
            state: CameraState::Closed,
            quality,
        }
    }

    pub fn device(&self) -> D {
        self.device.clone()
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn phase(&self) -> CameraPhase {
        match self.state {
            CameraState::Closed => CameraPhase::Closed,
            CameraState::Opening => CameraPhase::Opening,
            CameraState::Live(_) => CameraPhase::Live,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, CameraState::Live(_))
    }

    /// `false` when a session is already opening or live.
    pub fn begin_open(&mut self) -> bool {
        if !matches!(self.state, CameraState::Closed) {
            return false;
        }
        self.state = CameraState::Opening;
        true
    }

    pub fn finish_open(&mut self, result: CaptureResult<D::Stream>) -> CaptureResult<()> {
        let opening = matches!(self.state, CameraState::Opening);
        match result {
            Ok(stream) if opening => {
                info!("camera live");
                self.state = CameraState::Live(stream);
                Ok(())
            }
            Err(err) if opening => {
                warn!(%err, "camera unavailable");
                self.state = CameraState::Closed;
                Err(err)
            }
            // Closed while the permission prompt was up.
            Ok(stream) => {
                debug!("camera granted after close, releasing");
                self.device.stop(&stream);
                Ok(())
            }
            Err(_) => Ok(()),
        }
    }

    pub async fn open(&mut self) -> CaptureResult<()> {
        if !self.begin_open() {
            return Ok(());
        }
        let result = acquire_stream(&self.device).await;
        self.finish_open(result)
    }

    /// Stop all tracks and return to `Closed`. Safe to call in any phase.
    pub fn close(&mut self) {
        if let CameraState::Live(stream) = &self.state {
            self.device.stop(stream);
            debug!("camera closed");
        }
        self.state = CameraState::Closed;
    }

    pub fn live_stream(&self) -> CaptureResult<D::Stream> {
        match &self.state {
            CameraState::Live(stream) => Ok(stream.clone()),
            _ => Err(CaptureError::NoSession),
        }
    }

    /// A successful snapshot ends the session; a failed one leaves it live.
    pub fn finish_capture(
        &mut self,
        result: CaptureResult<CapturedImage>,
    ) -> CaptureResult<CapturedImage> {
        let image = result?;
        info!(
            width = image.width,
            height = image.height,
            bytes = image.bytes.len(),
            "snapshot captured"
        );
        self.close();
        Ok(image)
    }

    pub async fn capture(&mut self) -> CaptureResult<CapturedImage> {
        let stream = self.live_stream()?;
        let result = self.device.grab_frame(&stream, self.quality).await;
        self.finish_capture(result)
    }
}

/// Ask for the rear camera, then for any camera.
pub async fn acquire_stream<D: CameraDevice>(device: &D) -> CaptureResult<D::Stream> {
    match device.request_stream(Facing::Environment).await {
        Ok(stream) => Ok(stream),
        Err(CaptureError::Unsupported) => Err(CaptureError::Unsupported),
        Err(err) => {
            warn!(%err, "rear camera unavailable, trying default camera");
            device.request_stream(Facing::Any).await
        }
    }
}
