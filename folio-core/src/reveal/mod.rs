//! # Reveal 模块
//!
//! 可复用的文字显隐动画：把内容拆成字符，渲染主层与两层残影，
//! 由布尔可见性驱动进场与退场。

mod glyph;
mod props;
mod text;

pub use glyph::{AnimatableGlyph, GlyphStyle, LayerKind};
pub use props::{RevealMode, RevealProps, RevealVariant};
pub use text::{RevealTimeline, TextReveal};
