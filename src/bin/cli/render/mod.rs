mod terminal;

pub use terminal::{duration, paint, score_color, score_counts, Color};
