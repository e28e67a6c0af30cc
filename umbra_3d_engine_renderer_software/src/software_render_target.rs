/// RenderTarget - software implementation of the RenderTarget trait

use std::any::Any;
use std::sync::Arc;
use umbra_3d_engine::umbra3d::device::{RenderTarget, Texture};
use crate::software_texture::SoftwareDepthTexture;

/// Depth-only offscreen target writing into a `SoftwareDepthTexture`
pub struct SoftwareRenderTarget {
    depth: Arc<dyn Texture>,
    width: u32,
    height: u32,
}

impl SoftwareRenderTarget {
    /// Returns `None` if `depth` was not created by the software backend
    pub fn new(depth: Arc<dyn Texture>) -> Option<Self> {
        depth.as_any().downcast_ref::<SoftwareDepthTexture>()?;
        let (width, height) = (depth.info().width, depth.info().height);
        Some(Self { depth, width, height })
    }

    /// The attached depth texture
    pub(crate) fn depth(&self) -> Option<&SoftwareDepthTexture> {
        self.depth.as_any().downcast_ref::<SoftwareDepthTexture>()
    }
}

impl RenderTarget for SoftwareRenderTarget {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn depth_texture(&self) -> Option<&Arc<dyn Texture>> {
        Some(&self.depth)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
