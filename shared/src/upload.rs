use crate::model::AnalysisRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    Drop,
    Picker,
}

/// Gatekeeper behind the drop zone and the file picker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadSurface {
    drag_active: bool,
}

impl UploadSurface {
    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// drag-enter and drag-over
    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Hands an image to `on_accept`; anything else is dropped without a
    /// call. Returns whether the file was accepted.
    pub fn receive<P>(
        &mut self,
        channel: InputChannel,
        filename: &str,
        mime_type: &str,
        payload: P,
        on_accept: impl FnOnce(AnalysisRequest<P>),
    ) -> bool {
        if channel == InputChannel::Drop {
            self.drag_active = false;
        }

        match AnalysisRequest::new(filename, mime_type, payload) {
            Ok(request) => {
                on_accept(request);
                true
            }
            Err(e) => {
                log::warn!("Skipping non-image file: {}", e);
                false
            }
        }
    }
}
