use super::egl::attrib;

/// Construction parameters for a [`GpuSurface`](super::GpuSurface).
///
/// The defaults describe the only configuration the renderer is written for:
/// 8-bit RGBA, OpenGL ES 2, window-presentable.
#[derive(Debug, Clone)]
pub struct SurfaceInit {
    pub red_bits: i32,
    pub green_bits: i32,
    pub blue_bits: i32,
    pub alpha_bits: i32,

    /// OpenGL ES client version requested for the context.
    pub client_version: i32,

    /// Request a config whose buffers a video encoder can consume
    /// (`EGL_RECORDABLE_ANDROID`).
    ///
    /// Desktop EGL implementations reject the attribute, so this is only on by
    /// default on Android.
    pub recordable: bool,
}

impl Default for SurfaceInit {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            client_version: 2,
            recordable: cfg!(target_os = "android"),
        }
    }
}

impl SurfaceInit {
    /// `NONE`-terminated attribute list for `eglChooseConfig`.
    pub(crate) fn config_attributes(&self) -> Vec<i32> {
        let mut attributes = vec![
            attrib::RED_SIZE,
            self.red_bits,
            attrib::GREEN_SIZE,
            self.green_bits,
            attrib::BLUE_SIZE,
            self.blue_bits,
            attrib::ALPHA_SIZE,
            self.alpha_bits,
            attrib::RENDERABLE_TYPE,
            attrib::OPENGL_ES2_BIT,
            attrib::SURFACE_TYPE,
            attrib::WINDOW_BIT,
        ];

        if self.recordable {
            attributes.extend_from_slice(&[attrib::RECORDABLE_ANDROID, 1]);
        }

        attributes.push(attrib::NONE);
        attributes
    }

    /// `NONE`-terminated attribute list for `eglCreateContext`.
    pub(crate) fn context_attributes(&self) -> [i32; 3] {
        [attrib::CONTEXT_CLIENT_VERSION, self.client_version, attrib::NONE]
    }

    /// Human-readable summary used in config selection errors.
    pub(crate) fn describe(&self) -> String {
        format!(
            "RGBA{}{}{}{} ES{} window{}",
            self.red_bits,
            self.green_bits,
            self.blue_bits,
            self.alpha_bits,
            self.client_version,
            if self.recordable { " recordable" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_attributes_are_none_terminated() {
        let init = SurfaceInit { recordable: false, ..SurfaceInit::default() };
        let attrs = init.config_attributes();
        assert_eq!(attrs.last(), Some(&attrib::NONE));
        assert_eq!(attrs.len() % 2, 1);
        assert!(!attrs.contains(&attrib::RECORDABLE_ANDROID));
    }

    #[test]
    fn recordable_adds_android_attribute() {
        let init = SurfaceInit { recordable: true, ..SurfaceInit::default() };
        let attrs = init.config_attributes();
        let pos = attrs.iter().position(|&a| a == attrib::RECORDABLE_ANDROID).unwrap();
        assert_eq!(attrs[pos + 1], 1);
    }

    #[test]
    fn describe_mentions_depths_and_version() {
        let init = SurfaceInit { recordable: false, ..SurfaceInit::default() };
        assert_eq!(init.describe(), "RGBA8888 ES2 window");
    }
}
