pub mod axis;
pub mod joint;
pub mod shape;

pub use joint::{AxisPoint, Joint, Segment, ShapeEnd};
pub use shape::{Shape, ShapeCut};
