use crate::ValueZipper;
use crate::registry::FunctionName;
use vigil_common::number::Number;

/// `value * vector`, identity 1.
pub struct ScaleValueZipper;

impl ValueZipper for ScaleValueZipper {
    fn name(&self) -> &'static str {
        FunctionName::ScaleV.as_str()
    }

    fn identity(&self) -> Number {
        Number::ONE
    }

    fn zip(&self, value: Number, vector: Number) -> Number {
        value * vector
    }
}

/// `value + vector`, identity 0.
pub struct SumValueZipper;

impl ValueZipper for SumValueZipper {
    fn name(&self) -> &'static str {
        FunctionName::SumV.as_str()
    }

    fn identity(&self) -> Number {
        Number::ZERO
    }

    fn zip(&self, value: Number, vector: Number) -> Number {
        value + vector
    }
}

/// `value - vector`, identity 0.
pub struct DiffValueZipper;

impl ValueZipper for DiffValueZipper {
    fn name(&self) -> &'static str {
        FunctionName::DiffV.as_str()
    }

    fn identity(&self) -> Number {
        Number::ZERO
    }

    fn zip(&self, value: Number, vector: Number) -> Number {
        value - vector
    }
}
