//! Avatar fade - hides the local avatar as the camera closes in on it

/// Camera distance at which fading starts
pub const FADE_START: f32 = 0.6;
/// Camera distance at which the avatar is fully hidden
pub const FADE_END: f32 = 0.2;
pub const FADE_RANGE: f32 = FADE_START - FADE_END;

/// Distance changes smaller than this are ignored
const EPSILON: f32 = 1e-11;

/// What the host should do to the avatar this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadeAction {
    None,
    Hide,
    Fade(f32),
    EndFade,
    ShowAndFade(f32),
    ShowAndEndFade,
}

impl FadeAction {
    /// Target opacity, if the action sets one
    pub fn opacity(self) -> Option<f32> {
        match self {
            FadeAction::None => None,
            FadeAction::Hide => Some(0.0),
            FadeAction::Fade(p) | FadeAction::ShowAndFade(p) => Some(p),
            FadeAction::EndFade | FadeAction::ShowAndEndFade => Some(1.0),
        }
    }
}

/// Fade state for a non-immersive avatar
#[derive(Clone, Debug)]
pub struct AvatarFade {
    last_update: u64,
    last_distance: Option<f32>,
    displayed: bool,
}

impl Default for AvatarFade {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarFade {
    pub fn new() -> Self {
        Self {
            last_update: 0,
            last_distance: None,
            displayed: true,
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Run once per frame with the controls update number and camera distance
    pub fn update(&mut self, controls_update: u64, camera_distance: f32) -> FadeAction {
        if self.last_update == controls_update {
            return FadeAction::None;
        }
        self.last_update = controls_update;

        if camera_distance > FADE_START * 2.0 {
            return FadeAction::None;
        }
        if let Some(last) = self.last_distance {
            if (camera_distance - last).abs() < EPSILON {
                return FadeAction::None;
            }
        }
        self.last_distance = Some(camera_distance);

        let percent = (camera_distance.max(FADE_END) - FADE_END) / FADE_RANGE;
        if percent == 0.0 {
            if self.displayed {
                self.displayed = false;
                return FadeAction::Hide;
            }
            return FadeAction::None;
        }

        let show = !self.displayed;
        self.displayed = true;

        match (show, percent < 1.0) {
            (false, true) => FadeAction::Fade(percent),
            (false, false) => FadeAction::EndFade,
            (true, true) => FadeAction::ShowAndFade(percent),
            (true, false) => FadeAction::ShowAndEndFade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_update_is_ignored() {
        let mut fade = AvatarFade::new();
        assert_eq!(fade.update(0, 0.4), FadeAction::None);

        assert!(matches!(fade.update(1, 0.4), FadeAction::Fade(_)));
        assert_eq!(fade.update(1, 0.3), FadeAction::None);
    }

    #[test]
    fn test_far_camera_is_ignored() {
        let mut fade = AvatarFade::new();
        assert_eq!(fade.update(1, 1.5), FadeAction::None);
        assert!(fade.is_displayed());
    }

    #[test]
    fn test_fade_percent() {
        let mut fade = AvatarFade::new();
        match fade.update(1, 0.4) {
            FadeAction::Fade(p) => assert!((p - 0.5).abs() < 1e-5),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fade.update(2, 0.9), FadeAction::EndFade);
    }

    #[test]
    fn test_hide_then_show() {
        let mut fade = AvatarFade::new();
        assert_eq!(fade.update(1, 0.1), FadeAction::Hide);
        assert!(!fade.is_displayed());

        // Still inside the hidden zone
        assert_eq!(fade.update(2, 0.15), FadeAction::None);

        assert_eq!(fade.update(3, 1.0), FadeAction::ShowAndEndFade);
        assert!(fade.is_displayed());

        assert_eq!(fade.update(4, 0.0), FadeAction::Hide);
        assert!(matches!(fade.update(5, 0.3), FadeAction::ShowAndFade(_)));
    }

    #[test]
    fn test_unchanged_distance_is_ignored() {
        let mut fade = AvatarFade::new();
        assert!(matches!(fade.update(1, 0.5), FadeAction::Fade(_)));
        assert_eq!(fade.update(2, 0.5), FadeAction::None);
    }

    #[test]
    fn test_opacity() {
        assert_eq!(FadeAction::Hide.opacity(), Some(0.0));
        assert_eq!(FadeAction::None.opacity(), None);
        assert_eq!(FadeAction::ShowAndEndFade.opacity(), Some(1.0));
    }
}
