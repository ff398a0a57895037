use crate::{domain::CoverArt, error::SessionError, player::AudioSource};
use image::{ImageFormat, RgbaImage};
use std::{collections::HashMap, sync::Arc};

/// Edge length covers are reduced to once decoded.
pub const COVER_SIZE: u32 = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Audio,
    Cover,
}

/// Revocable reference to data held by the [`ResourceRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

enum Resource {
    Audio(AudioSource),
    Cover(Arc<RgbaImage>),
}

/// Owner of every live audio/cover resource. Data stays reachable until its
/// handle is revoked.
#[derive(Default)]
pub struct ResourceRegistry {
    next_id: u64,
    live: HashMap<u64, Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, kind: ResourceKind, resource: Resource) -> ResourceHandle {
        self.next_id += 1;
        self.live.insert(self.next_id, resource);
        ResourceHandle {
            id: self.next_id,
            kind,
        }
    }

    pub fn create_audio(&mut self, source: AudioSource) -> ResourceHandle {
        self.insert(ResourceKind::Audio, Resource::Audio(source))
    }

    /// Decode embedded art into a renderable image. Nothing is registered
    /// when decoding fails.
    pub fn create_cover(&mut self, art: &CoverArt) -> Result<ResourceHandle, SessionError> {
        let image = decode_cover(&art.bytes, &art.mime_type)?;
        Ok(self.insert(ResourceKind::Cover, Resource::Cover(Arc::new(image))))
    }

    /// Returns `false` if the handle was already revoked.
    pub fn revoke(&mut self, handle: ResourceHandle) -> bool {
        self.live.remove(&handle.id).is_some()
    }

    pub fn audio(&self, handle: ResourceHandle) -> Option<AudioSource> {
        match self.live.get(&handle.id)? {
            Resource::Audio(source) => Some(source.clone()),
            Resource::Cover(_) => None,
        }
    }

    pub fn cover(&self, handle: ResourceHandle) -> Option<Arc<RgbaImage>> {
        match self.live.get(&handle.id)? {
            Resource::Cover(image) => Some(Arc::clone(image)),
            Resource::Audio(_) => None,
        }
    }

    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.live
            .values()
            .filter(|r| match r {
                Resource::Audio(_) => kind == ResourceKind::Audio,
                Resource::Cover(_) => kind == ResourceKind::Cover,
            })
            .count()
    }
}

fn decode_cover(bytes: &[u8], mime_type: &str) -> Result<RgbaImage, SessionError> {
    let decoded = match ImageFormat::from_mime_type(mime_type) {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    }
    .map_err(|e| SessionError::CoverDecode(e.to_string()))?;

    Ok(decoded.thumbnail(COVER_SIZE, COVER_SIZE).to_rgba8())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::FileType;
    use image::{DynamicImage, Rgba};
    use std::io::Cursor;

    pub(crate) fn png_cover(width: u32, height: u32) -> CoverArt {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        CoverArt {
            bytes: Arc::from(bytes),
            mime_type: "image/png".into(),
        }
    }

    #[test]
    fn cover_is_decoded_and_shrunk() {
        let mut reg = ResourceRegistry::new();
        let handle = reg.create_cover(&png_cover(200, 100)).unwrap();
        let image = reg.cover(handle).unwrap();

        assert_eq!(handle.kind(), ResourceKind::Cover);
        assert!(image.width() <= COVER_SIZE && image.height() <= COVER_SIZE);
        assert_eq!(reg.live_count(ResourceKind::Cover), 1);
    }

    #[test]
    fn unknown_mime_is_sniffed() {
        let mut reg = ResourceRegistry::new();
        let mut art = png_cover(4, 4);
        art.mime_type = String::new();

        assert!(reg.create_cover(&art).is_ok());
    }

    #[test]
    fn broken_cover_registers_nothing() {
        let mut reg = ResourceRegistry::new();
        let art = CoverArt {
            bytes: Arc::from(vec![0u8, 1, 2, 3]),
            mime_type: "image/jpeg".into(),
        };

        assert!(matches!(reg.create_cover(&art), Err(SessionError::CoverDecode(_))));
        assert_eq!(reg.live_count(ResourceKind::Cover), 0);
    }

    #[test]
    fn revoke_is_single_shot() {
        let mut reg = ResourceRegistry::new();
        let handle = reg.create_audio(AudioSource {
            bytes: Arc::from(vec![1u8]),
            format: FileType::MP3,
        });

        assert!(reg.audio(handle).is_some());
        assert!(reg.revoke(handle));
        assert!(!reg.revoke(handle));
        assert!(reg.audio(handle).is_none());
        assert_eq!(reg.live_count(ResourceKind::Audio), 0);
    }
}
