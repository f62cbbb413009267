use crate::capture::{CameraDevice, CameraPhase, MediaCapture, acquire_stream};
use crate::config::CONFIG;
use crate::types::{ClassificationMode, ImageSource};
use crate::ui::{Backend, Markdown};
use crate::views::ResultPanel;
use crate::web::{
    PlatformCamera, VIDEO_ELEMENT_ID, alert, platform_camera, preview_for, release_preview,
    reset_file_input,
};
use crate::workflow::UploadWorkflow;
use dioxus::prelude::*;
use std::path::Path;
use tracing::warn;

const IMAGE_INPUT_ID: &str = "image-input";

fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}

#[component]
pub fn UploadView() -> Element {
    let backend = use_context::<Backend>();
    let markdown = use_context::<Markdown>();
    let mut workflow =
        use_signal(|| UploadWorkflow::new(CONFIG.default_mode, CONFIG.map_confidence));
    let mut camera: Signal<MediaCapture<PlatformCamera>> =
        use_signal(|| MediaCapture::new(platform_camera(), CONFIG.jpeg_quality));

    use_drop(move || {
        if let Ok(mut camera) = camera.try_write() {
            camera.close();
        }
        if let Ok(mut workflow) = workflow.try_write()
            && let Some(url) = workflow.clear()
        {
            release_preview(&url);
        }
    });

    let on_file = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(path) = engine.files().into_iter().next() else {
            return;
        };
        let Some(bytes) = engine.read_file(&path).await else {
            warn!("could not read the chosen file");
            return;
        };
        let source = ImageSource::from_file(display_name(&path), bytes);
        let preview = preview_for(source.bytes(), source.mime());
        let released = workflow.write().select(source, preview);
        if let Some(url) = released {
            release_preview(&url);
        }
    };

    let open_camera = move |_: MouseEvent| async move {
        if !camera.write().begin_open() {
            return;
        }
        workflow.write().camera_starting();
        let device = camera.peek().device();
        let result = acquire_stream(&device).await;
        let opened = camera.write().finish_open(result);
        match opened {
            Ok(()) => workflow.write().camera_started(),
            Err(err) => {
                alert(&format!("Camera error: {err}"));
                workflow.write().camera_failed();
            }
        }
    };

    let snap = move |_: MouseEvent| async move {
        let (stream, device, quality) = {
            let capture = camera.peek();
            match capture.live_stream() {
                Ok(stream) => (stream, capture.device(), capture.quality()),
                Err(err) => {
                    warn!(%err, "snapshot requested without a live camera");
                    return;
                }
            }
        };
        let result = device.grab_frame(&stream, quality).await;
        let captured = camera.write().finish_capture(result);
        match captured {
            Ok(image) => {
                let preview = preview_for(&image.bytes, &image.mime);
                let released = workflow.write().select(ImageSource::Captured(image), preview);
                if let Some(url) = released {
                    release_preview(&url);
                }
            }
            Err(err) => warn!(%err, "snapshot failed"),
        }
    };

    let remove_image = move |_: MouseEvent| {
        let released = workflow.write().clear();
        if let Some(url) = released {
            release_preview(&url);
        }
        reset_file_input(IMAGE_INPUT_ID);
    };

    let submit = move |_: MouseEvent| {
        let backend = backend.clone();
        let markdown = markdown.clone();
        async move {
            let begun = workflow.write().begin_submit();
            let Ok(ticket) = begun else {
                return;
            };
            let outcome = backend.0.predict(&ticket.upload).await;
            workflow
                .write()
                .finish_submit(&ticket, outcome, markdown.0.as_deref());
        }
    };

    let state = workflow.read();
    let phase = camera.read().phase();
    let selection = state.selection();
    let preview_url = selection.preview().map(|p| p.url().to_string());
    let file_label = selection.current().map(|source| source.upload_name().to_string());
    let mode = state.mode();
    let submit_enabled = state.submission().is_submit_enabled();
    let status = state.submission().status().clone();
    let result = state.submission().result().cloned();
    let camera_visible = phase != CameraPhase::Closed;

    rsx! {
        section { id: "upload", class: "upload-card",
            div { class: "mode-select",
                for choice in ClassificationMode::ALL {
                    label { class: "mode-option",
                        input {
                            r#type: "radio",
                            name: "choice",
                            value: choice.as_str(),
                            checked: mode == choice,
                            onchange: move |_| workflow.write().set_mode(choice),
                        }
                        " {choice.label()}"
                    }
                }
            }

            if selection.shows_placeholder() && !camera_visible {
                div { id: "upload-placeholder", class: "upload-placeholder",
                    label { class: "btn btn-ghost", r#for: IMAGE_INPUT_ID, "Upload photo" }
                    button {
                        id: "open-camera-btn",
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: open_camera,
                        "Use camera"
                    }
                }
            }
            input {
                id: IMAGE_INPUT_ID,
                class: "hidden",
                r#type: "file",
                accept: "image/*",
                onchange: on_file,
            }

            div { id: "camera-container", class: if camera_visible { "camera-container" } else { "camera-container hidden" },
                video {
                    id: VIDEO_ELEMENT_ID,
                    autoplay: true,
                    playsinline: true,
                    muted: true,
                }
                div { class: "hstack",
                    button {
                        id: "snap-btn",
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: phase != CameraPhase::Live,
                        onclick: snap,
                        "Take photo"
                    }
                    button {
                        id: "close-camera-btn",
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| camera.write().close(),
                        "Close camera"
                    }
                }
            }

            if !selection.shows_placeholder() {
                div { id: "preview-container", class: "preview-container",
                    if let Some(url) = preview_url {
                        img { id: "preview-img", src: "{url}", alt: "Selected photo" }
                    } else if let Some(name) = file_label {
                        p { class: "text-muted", "{name}" }
                    }
                    button {
                        id: "remove-img-btn",
                        class: "action-btn",
                        r#type: "button",
                        onclick: remove_image,
                        "Remove"
                    }
                }
            }

            button {
                id: "submit-btn",
                class: "btn btn-primary",
                r#type: "button",
                disabled: !submit_enabled,
                onclick: submit,
                "Identify"
            }

            ResultPanel { status, result }
        }
    }
}
