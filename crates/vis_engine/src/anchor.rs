//! Anchor points for positioning rectangles and text

use crate::foundation::math::Vec2;

/// Anchor describing which point of an element the caller's position
/// refers to. Y is up: `TopLeft` means maximum y, minimum x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Element centre
    Centre,
    /// Middle of the left edge
    CentreLeft,
    /// Middle of the right edge
    CentreRight,
    /// Middle of the top edge
    CentreTop,
    /// Middle of the bottom edge
    CentreBottom,
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
    /// Text only: centre-left of the first line. The vertical centre
    /// comes from the line's em box, not the glyphs actually present,
    /// so positioning doesn't shift with the characters used.
    TextCentreLeft,
    /// Text only: centre of the first line
    TextFirstLineCentre,
    /// Text only: centre of the whole text block, first-line metrics
    /// for the vertical reference
    TextCentre,
}

impl Anchor {
    /// Centre of a rectangle of `size` whose `anchor` point sits at
    /// `pos`. The text-specific anchors behave like [`Anchor::Centre`]
    /// for plain rectangles.
    pub fn rect_centre(self, pos: Vec2, size: Vec2) -> Vec2 {
        let half = size * 0.5;
        let offset = match self {
            Self::Centre | Self::TextFirstLineCentre | Self::TextCentre => Vec2::zeros(),
            Self::CentreLeft | Self::TextCentreLeft => Vec2::new(half.x, 0.0),
            Self::CentreRight => Vec2::new(-half.x, 0.0),
            Self::CentreTop => Vec2::new(0.0, -half.y),
            Self::CentreBottom => Vec2::new(0.0, half.y),
            Self::TopLeft => Vec2::new(half.x, -half.y),
            Self::TopRight => Vec2::new(-half.x, -half.y),
            Self::BottomLeft => Vec2::new(half.x, half.y),
            Self::BottomRight => Vec2::new(-half.x, half.y),
        };
        pos + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_centres() {
        let size = Vec2::new(10.0, 4.0);
        let pos = Vec2::new(0.0, 0.0);
        assert_eq!(Anchor::Centre.rect_centre(pos, size), Vec2::zeros());
        assert_eq!(Anchor::BottomLeft.rect_centre(pos, size), Vec2::new(5.0, 2.0));
        assert_eq!(Anchor::TopRight.rect_centre(pos, size), Vec2::new(-5.0, -2.0));
        assert_eq!(Anchor::CentreLeft.rect_centre(pos, size), Vec2::new(5.0, 0.0));
    }
}
