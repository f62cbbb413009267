//! Browser glue.
//!
//! Everything that touches `web_sys` lives here behind
//! `cfg(target_arch = "wasm32")`; native builds get inert stand-ins so the
//! rest of the crate (and its tests) never needs a browser.

use crate::capture::{CameraDevice, Facing};
use crate::error::{CaptureError, CaptureResult};
use crate::selection::Preview;
use crate::types::CapturedImage;
use async_trait::async_trait;

pub const VIDEO_ELEMENT_ID: &str = "video-feed";

#[cfg(target_arch = "wasm32")]
pub type PlatformCamera = browser::BrowserCamera;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformCamera = NoCamera;

pub fn platform_camera() -> PlatformCamera {
    #[cfg(target_arch = "wasm32")]
    {
        browser::BrowserCamera::new(VIDEO_ELEMENT_ID)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        NoCamera
    }
}

/// Camera stand-in for builds without `getUserMedia`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCamera;

#[async_trait(?Send)]
impl CameraDevice for NoCamera {
    type Stream = ();

    async fn request_stream(&self, _facing: Facing) -> CaptureResult<()> {
        Err(CaptureError::Unsupported)
    }

    async fn grab_frame(&self, _stream: &(), _quality: f64) -> CaptureResult<CapturedImage> {
        Err(CaptureError::NoSession)
    }

    fn stop(&self, _stream: &()) {}
}

#[cfg(target_arch = "wasm32")]
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn page_origin() -> Option<String> {
    None
}

/// Object URL for an in-memory image, released with [`release_preview`].
#[cfg(target_arch = "wasm32")]
pub fn preview_for(bytes: &[u8], mime: &str) -> Option<Preview> {
    use web_sys::{Blob, BlobPropertyBag, Url};

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).ok()?;
    Url::create_object_url_with_blob(&blob)
        .ok()
        .map(Preview::ObjectUrl)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn preview_for(_bytes: &[u8], _mime: &str) -> Option<Preview> {
    None
}

#[cfg(target_arch = "wasm32")]
pub fn release_preview(url: &str) {
    if web_sys::Url::revoke_object_url(url).is_err() {
        tracing::debug!(url, "object URL already released");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn release_preview(_url: &str) {}

#[cfg(target_arch = "wasm32")]
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn alert(message: &str) {
    tracing::warn!(message, "alert");
}

/// Empty a file input so picking the same file again fires `change`.
#[cfg(target_arch = "wasm32")]
pub fn reset_file_input(id: &str) {
    use wasm_bindgen::JsCast;

    if let Some(input) = element_by_id(id).and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn reset_file_input(_id: &str) {}

#[cfg(target_arch = "wasm32")]
pub fn scroll_to_bottom(id: &str) {
    if let Some(el) = element_by_id(id) {
        el.set_scroll_top(el.scroll_height());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_to_bottom(_id: &str) {}

#[cfg(target_arch = "wasm32")]
fn element_by_id(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::element_by_id;
    use crate::capture::{CameraDevice, Facing};
    use crate::error::{CaptureError, CaptureResult};
    use crate::types::{CAPTURE_MIME, CapturedImage};
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
        MediaStreamConstraints, MediaStreamTrack,
    };

    /// `getUserMedia` camera rendering into the page's `<video>` element.
    #[derive(Clone, Debug)]
    pub struct BrowserCamera {
        video_id: &'static str,
    }

    impl BrowserCamera {
        pub fn new(video_id: &'static str) -> Self {
            Self { video_id }
        }

        fn video(&self) -> Option<HtmlVideoElement> {
            element_by_id(self.video_id)?.dyn_into().ok()
        }
    }

    fn describe(err: &JsValue) -> String {
        if let Some(err) = err.dyn_ref::<js_sys::Error>() {
            return String::from(err.message());
        }
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }

    fn denied(err: JsValue) -> CaptureError {
        CaptureError::Denied(describe(&err))
    }

    fn encode(err: JsValue) -> CaptureError {
        CaptureError::Encode(describe(&err))
    }

    #[async_trait(?Send)]
    impl CameraDevice for BrowserCamera {
        type Stream = MediaStream;

        async fn request_stream(&self, facing: Facing) -> CaptureResult<MediaStream> {
            let window = web_sys::window().ok_or(CaptureError::Unsupported)?;
            let devices = window
                .navigator()
                .media_devices()
                .map_err(|_| CaptureError::Unsupported)?;

            let constraints = MediaStreamConstraints::new();
            match facing {
                Facing::Environment => {
                    let video = js_sys::Object::new();
                    js_sys::Reflect::set(&video, &"facingMode".into(), &"environment".into())
                        .map_err(denied)?;
                    constraints.set_video(&video);
                }
                Facing::Any => constraints.set_video(&JsValue::TRUE),
            }

            let promise = devices
                .get_user_media_with_constraints(&constraints)
                .map_err(denied)?;
            let stream: MediaStream = JsFuture::from(promise)
                .await
                .map_err(denied)?
                .dyn_into()
                .map_err(denied)?;

            if let Some(video) = self.video() {
                video.set_src_object(Some(&stream));
            }
            Ok(stream)
        }

        async fn grab_frame(
            &self,
            _stream: &MediaStream,
            quality: f64,
        ) -> CaptureResult<CapturedImage> {
            let video = self.video().ok_or(CaptureError::NoSession)?;
            let (width, height) = (video.video_width(), video.video_height());
            if width == 0 || height == 0 {
                return Err(CaptureError::NotReady);
            }

            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or(CaptureError::Unsupported)?;
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .map_err(encode)?
                .dyn_into()
                .map_err(|_| CaptureError::Encode("not a canvas".to_string()))?;
            canvas.set_width(width);
            canvas.set_height(height);

            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")
                .map_err(encode)?
                .ok_or_else(|| CaptureError::Encode("no 2d context".to_string()))?
                .dyn_into()
                .map_err(|_| CaptureError::Encode("not a 2d context".to_string()))?;
            ctx.draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            )
            .map_err(encode)?;

            let (tx, rx) = oneshot::channel::<Option<Blob>>();
            let on_blob = Closure::once(move |blob: JsValue| {
                let _ = tx.send(blob.dyn_into::<Blob>().ok());
            });
            canvas
                .to_blob_with_type_and_encoder_options(
                    on_blob.as_ref().unchecked_ref(),
                    CAPTURE_MIME,
                    &JsValue::from_f64(quality),
                )
                .map_err(encode)?;

            let blob = rx
                .await
                .map_err(|_| CaptureError::Encode("snapshot callback dropped".to_string()))?
                .ok_or_else(|| CaptureError::Encode("browser produced no image".to_string()))?;
            drop(on_blob);

            let buffer = JsFuture::from(blob.array_buffer()).await.map_err(encode)?;
            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

            Ok(CapturedImage {
                bytes,
                mime: CAPTURE_MIME.to_string(),
                width,
                height,
            })
        }

        fn stop(&self, stream: &MediaStream) {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
            if let Some(video) = self.video() {
                video.set_src_object(None);
            }
        }
    }
}
