//! Value parsers for compound command-line arguments.

use clap::ValueEnum;

use buoyancy_lib::{EndcapConstraint, GridRange};

/// Endcap edge support as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndcapArg {
    Fixed,
    Floating,
}

impl From<EndcapArg> for EndcapConstraint {
    fn from(arg: EndcapArg) -> Self {
        match arg {
            EndcapArg::Fixed => EndcapConstraint::Fixed,
            EndcapArg::Floating => EndcapConstraint::Floating,
        }
    }
}

/// Box edge lengths in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSize {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
}

/// Parse `min:max:step`, or a single value for a one-sample range.
pub fn parse_range(value: &str) -> Result<GridRange, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    let numbers = parts
        .iter()
        .map(|part| parse_number(part))
        .collect::<Result<Vec<f64>, String>>()?;
    match numbers.as_slice() {
        [single] => Ok(GridRange::fixed(*single)),
        [min, max, step] => Ok(GridRange::new(*min, *max, *step)),
        _ => Err(format!("expected MIN:MAX:STEP or a single value, got '{value}'")),
    }
}

/// Parse `WxHxD`.
pub fn parse_box(value: &str) -> Result<BoxSize, String> {
    let numbers = value
        .split(['x', 'X'])
        .map(|part| parse_number(part.trim()))
        .collect::<Result<Vec<f64>, String>>()?;
    match numbers.as_slice() {
        [width_mm, height_mm, depth_mm] => Ok(BoxSize {
            width_mm: *width_mm,
            height_mm: *height_mm,
            depth_mm: *depth_mm,
        }),
        _ => Err(format!("expected WIDTHxHEIGHTxDEPTH, got '{value}'")),
    }
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("'{text}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_range() {
        assert_eq!(
            parse_range("50:150:5").unwrap(),
            GridRange::new(50.0, 150.0, 5.0)
        );
    }

    #[test]
    fn single_value_is_fixed() {
        assert_eq!(parse_range(" 80 ").unwrap(), GridRange::fixed(80.0));
    }

    #[test]
    fn rejects_two_part_ranges() {
        assert!(parse_range("50:150").is_err());
        assert!(parse_range("a:b:c").is_err());
    }

    #[test]
    fn parses_box_sizes() {
        let size = parse_box("400x300X250.5").unwrap();
        assert_eq!(
            size,
            BoxSize {
                width_mm: 400.0,
                height_mm: 300.0,
                depth_mm: 250.5
            }
        );
        assert!(parse_box("400x300").is_err());
    }
}
