//! File operations for saving and loading layout documents.
//!
//! Native builds use `rfd` dialogs on the tokio runtime; the web build goes through a
//! hidden download link and file input. Either way the outcome comes back over the
//! channel in [`FileState`](super::state::FileState) and is applied on the next frame.

use super::state::{
    FileOperationResult, FloorplanApp, PendingConfirmAction, PendingLoadOperation,
    PendingSaveOperation,
};
use crate::document::Floorplan;
use eframe::egui;
use log::{error, info};
use std::sync::mpsc::Sender;

/// Suggested file name for new documents.
const DEFAULT_FILE_NAME: &str = "layout.json";

fn send_result(sender: &Option<Sender<FileOperationResult>>, result: FileOperationResult) {
    if let Some(tx) = sender {
        let _ = tx.send(result);
    }
}

impl FloorplanApp {
    /// Applies finished file operations and starts newly requested ones.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        self.drain_file_results();

        if let Some(save_op) = self.file.pending_save_operation.take() {
            self.start_save(save_op, ctx);
        }

        if let Some(PendingLoadOperation::Load) = self.file.pending_load_operation.take() {
            self.start_load(ctx);
        }
    }

    /// Applies every result waiting on the file operation channel.
    pub fn drain_file_results(&mut self) {
        let results: Vec<FileOperationResult> = match &self.file.file_operation_receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => return,
        };
        for result in results {
            self.apply_file_result(result);
        }
    }

    fn apply_file_result(&mut self, result: FileOperationResult) {
        match result {
            FileOperationResult::SaveCompleted(path) => {
                info!("saved layout to {path}");
                self.set_status(format!("Saved {path}"));
                self.file.current_path = Some(path);
                self.file.has_unsaved_changes = false;
            }
            FileOperationResult::LoadCompleted(path, content) => {
                match self.floorplan.load_json(&content) {
                    Ok(()) => {
                        info!("loaded layout from {path}");
                        self.set_status(format!("Opened {path}"));
                        self.file.current_path = Some(path);
                        self.file.has_unsaved_changes = false;
                        self.interaction = Default::default();
                        self.canvas.initialized = false;
                    }
                    Err(e) => {
                        error!("failed to load {path}: {e}");
                        self.set_status(format!("Could not open {path}: {e}"));
                    }
                }
            }
            FileOperationResult::OperationFailed(message) => {
                error!("file operation failed: {message}");
                self.set_status(message);
            }
        }
    }

    fn start_save(&mut self, save_op: PendingSaveOperation, ctx: &egui::Context) {
        let json = match self.floorplan.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("failed to serialize layout: {e}");
                self.set_status(format!("Could not save: {e}"));
                return;
            }
        };
        let sender = self.file.file_operation_sender.clone();
        let ctx = ctx.clone();

        let path = match (save_op, self.file.current_path.clone()) {
            (PendingSaveOperation::Save, Some(path)) if cfg!(not(target_arch = "wasm32")) => {
                Some(path)
            }
            _ => None,
        };

        #[cfg(target_arch = "wasm32")]
        {
            let _ = path;
            let result = match Self::trigger_download(DEFAULT_FILE_NAME, &json) {
                Ok(()) => FileOperationResult::SaveCompleted(DEFAULT_FILE_NAME.to_string()),
                Err(e) => FileOperationResult::OperationFailed(e),
            };
            send_result(&sender, result);
            ctx.request_repaint();
        }

        #[cfg(not(target_arch = "wasm32"))]
        tokio::spawn(async move {
            let path = match path {
                Some(path) => Some(std::path::PathBuf::from(path)),
                None => rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .set_file_name(DEFAULT_FILE_NAME)
                    .save_file()
                    .await
                    .map(|handle| handle.path().to_path_buf()),
            };
            if let Some(path) = path {
                let result = match std::fs::write(&path, json) {
                    Ok(()) => FileOperationResult::SaveCompleted(path.display().to_string()),
                    Err(e) => FileOperationResult::OperationFailed(format!(
                        "Failed to save {}: {e}",
                        path.display()
                    )),
                };
                send_result(&sender, result);
            }
            ctx.request_repaint();
        });
    }

    fn start_load(&mut self, ctx: &egui::Context) {
        let sender = self.file.file_operation_sender.clone();
        let ctx = ctx.clone();

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            match Self::show_open_file_picker().await {
                Some(file) => {
                    let name = file.name();
                    let result = match Self::read_file(file).await {
                        Ok(content) => FileOperationResult::LoadCompleted(name, content),
                        Err(e) => FileOperationResult::OperationFailed(e),
                    };
                    send_result(&sender, result);
                }
                None => log::warn!("open dialog cancelled or not supported"),
            }
            ctx.request_repaint();
        });

        #[cfg(not(target_arch = "wasm32"))]
        tokio::spawn(async move {
            let handle = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
                .await;
            if let Some(handle) = handle {
                let path = handle.path();
                let result = match std::fs::read_to_string(path) {
                    Ok(json) => FileOperationResult::LoadCompleted(path.display().to_string(), json),
                    Err(e) => FileOperationResult::OperationFailed(format!(
                        "Failed to read {}: {e}",
                        path.display()
                    )),
                };
                send_result(&sender, result);
            }
            ctx.request_repaint();
        });
    }

    /// Offers `content` as a browser download named `filename`.
    #[cfg(target_arch = "wasm32")]
    fn trigger_download(filename: &str, content: &str) -> Result<(), String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document found")?;
        let body = document.body().ok_or("No body found")?;

        let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(|_| "Failed to create blob")?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Failed to create object URL")?;

        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into()
            .map_err(|_| "Failed to cast to anchor element")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        body.append_child(&anchor)
            .map_err(|_| "Failed to append anchor")?;
        anchor.click();
        body.remove_child(&anchor)
            .map_err(|_| "Failed to remove anchor")?;

        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
        Ok(())
    }

    /// Lets the user pick a JSON file through a hidden file input.
    #[cfg(target_arch = "wasm32")]
    async fn show_open_file_picker() -> Option<web_sys::File> {
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let body = document.body()?;
        let input: web_sys::HtmlInputElement =
            document.create_element("input").ok()?.dyn_into().ok()?;
        input.set_type("file");
        input.set_accept(".json,application/json");
        input.style().set_property("display", "none").ok()?;

        let (tx, rx) = futures::channel::oneshot::channel::<Option<web_sys::File>>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let onchange = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let file = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(file);
            }
        }) as Box<dyn FnMut(_)>);
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        body.append_child(&input).ok()?;
        input.click();
        let file = rx.await.ok()?;
        body.remove_child(&input).ok()?;
        file
    }

    /// Reads a picked file as text.
    #[cfg(target_arch = "wasm32")]
    async fn read_file(file: web_sys::File) -> Result<String, String> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::{JsCast, JsValue};

        let reader =
            web_sys::FileReader::new().map_err(|_| "Failed to create FileReader".to_string())?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let source = reader.clone();
            let onload = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
                if let Ok(text) = source.result() {
                    let _ = resolve.call1(&JsValue::NULL, &text);
                }
            }) as Box<dyn FnMut(_)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
                let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("Failed to read file"));
            }) as Box<dyn FnMut(_)>);
            reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        });

        reader
            .read_as_text(&file)
            .map_err(|_| "Failed to start reading file".to_string())?;
        let text = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| format!("Failed to read file: {e:?}"))?;
        text.as_string()
            .ok_or_else(|| "File content is not text".to_string())
    }

    /// Asks for a file name and saves the floorplan there.
    pub fn save_as_floorplan(&mut self) {
        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
    }

    /// Saves to the current path, or asks for one if there is none yet.
    pub fn save_floorplan(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_save_operation = Some(PendingSaveOperation::Save);
        } else {
            self.save_as_floorplan();
        }
    }

    /// Shows the open dialog.
    pub fn open_floorplan(&mut self) {
        self.file.pending_load_operation = Some(PendingLoadOperation::Load);
    }

    /// Replaces the floorplan with an empty one.
    pub fn new_floorplan(&mut self) {
        self.floorplan = Floorplan::new(&self.config);
        self.file.current_path = None;
        self.file.has_unsaved_changes = false;
        self.interaction = Default::default();
        self.canvas.offset = egui::Vec2::ZERO;
        self.canvas.zoom_factor = 1.0;
        self.canvas.initialized = false;
        self.status = None;
    }

    /// Runs `action` now, or asks first when there are unsaved changes.
    pub fn request_action(&mut self, action: PendingConfirmAction) {
        if self.file.has_unsaved_changes {
            self.file.show_unsaved_dialog = true;
            self.file.pending_confirm_action = Some(action);
        } else {
            self.perform_confirmed_action(action, None);
        }
    }

    /// Carries out an action the user has agreed to.
    ///
    /// Quitting needs the egui context to send the close command.
    pub fn perform_confirmed_action(
        &mut self,
        action: PendingConfirmAction,
        ctx: Option<&egui::Context>,
    ) {
        match action {
            PendingConfirmAction::New => self.new_floorplan(),
            PendingConfirmAction::Open => self.open_floorplan(),
            PendingConfirmAction::Quit => {
                self.file.allow_close_on_next_request = true;
                if let Some(ctx) = ctx {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }
}
