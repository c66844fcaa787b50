pub(crate) mod probe;
pub(crate) mod raster;
pub(crate) mod view;

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context, Error};
use tessera_core::DVec2;

/// World location given on the command line as `X,Y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Point(pub(crate) DVec2);

impl FromStr for Point {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| anyhow!("expected X,Y but got {value:?}"))?;
        let x = x.trim().parse().with_context(|| format!("invalid x in {value:?}"))?;
        let y = y.trim().parse().with_context(|| format!("invalid y in {value:?}"))?;
        Ok(Self(DVec2::new(x, y)))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.x, self.0.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_from_comma_pairs() {
        let point: Point = "85, 70.5".parse().expect("valid point");
        assert_eq!(point.0, DVec2::new(85.0, 70.5));
        assert!("85".parse::<Point>().is_err());
        assert!("a,1".parse::<Point>().is_err());
    }
}
