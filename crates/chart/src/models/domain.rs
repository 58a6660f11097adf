use serde::{Serialize, Serializer};

/// One end of an axis domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisBound {
    /// Let the renderer scale to the data.
    Auto,
    Fixed(f64),
}

impl AxisBound {
    pub fn value(&self) -> Option<f64> {
        match self {
            AxisBound::Auto => None,
            AxisBound::Fixed(v) => Some(*v),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, AxisBound::Auto)
    }
}

/// Serialized as a number, or the string `"auto"`.
impl Serialize for AxisBound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AxisBound::Auto => serializer.serialize_str("auto"),
            AxisBound::Fixed(v) => serializer.serialize_f64(*v),
        }
    }
}

/// `{min, max}` for one chart pane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: AxisBound,
    pub max: AxisBound,
}

impl AxisDomain {
    pub fn auto() -> Self {
        Self {
            min: AxisBound::Auto,
            max: AxisBound::Auto,
        }
    }

    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min: AxisBound::Fixed(min),
            max: AxisBound::Fixed(max),
        }
    }

    /// Both ends fixed.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.min.value()?, self.max.value()?))
    }

    pub fn span(&self) -> Option<f64> {
        self.bounds().map(|(min, max)| max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_serialization() {
        let json = serde_json::to_string(&AxisDomain::auto()).unwrap();
        assert_eq!(json, r#"{"min":"auto","max":"auto"}"#);

        let domain = AxisDomain {
            min: AxisBound::Fixed(0.0),
            max: AxisBound::Auto,
        };
        let json = serde_json::to_string(&domain).unwrap();
        assert_eq!(json, r#"{"min":0.0,"max":"auto"}"#);
    }

    #[test]
    fn test_span() {
        assert_eq!(AxisDomain::fixed(10.0, 25.0).span(), Some(15.0));
        assert_eq!(AxisDomain::auto().span(), None);
    }
}
