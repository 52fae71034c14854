use super::backend::Fragment;

/// MIME type of every finalized recording
pub const AUDIO_WEBM: &str = "audio/webm";

/// Finalized recording handed to the caller of `stop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    data: Vec<u8>,
    mime_type: &'static str,
}

impl AudioBlob {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Ordered fragments collected during one recording session
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    fragments: Vec<Fragment>,
    total_bytes: usize,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, ignoring empty ones
    ///
    /// Returns whether the fragment was kept.
    pub fn push(&mut self, fragment: Fragment) -> bool {
        if fragment.is_empty() {
            return false;
        }

        self.total_bytes += fragment.len();
        self.fragments.push(fragment);
        true
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate all fragments in arrival order
    pub fn into_blob(self) -> AudioBlob {
        let mut data = Vec::with_capacity(self.total_bytes);
        for fragment in self.fragments {
            data.extend_from_slice(&fragment.data);
        }

        AudioBlob {
            data,
            mime_type: AUDIO_WEBM,
        }
    }
}
