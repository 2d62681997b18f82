use crate::error::Result;
use regex::Regex;
use simple_error::{SimpleError, bail};
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scale {
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl Scale {
    pub fn to_long_string(&self) -> String {
        match self {
            Scale::Tera => "tera".to_string(),
            Scale::Giga => "giga".to_string(),
            Scale::Mega => "mega".to_string(),
            Scale::Kilo => "kilo".to_string(),
            Scale::Base => "".to_string(),
            Scale::Centi => "centi".to_string(),
            Scale::Milli => "milli".to_string(),
            Scale::Micro => "micro".to_string(),
            Scale::Nano => "nano".to_string(),
            Scale::Pico => "pico".to_string(),
            Scale::Femto => "femto".to_string(),
            Scale::Atto => "atto".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Scale::Atto => "a",
            Scale::Femto => "f",
            Scale::Pico => "p",
            Scale::Nano => "n",
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Centi => "c",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Pico = 1e-12
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Atto => 1e-18,
            Scale::Femto => 1e-15,
            Scale::Pico => 1e-12,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Centi => 1e-2,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }
}

impl FromStr for Scale {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Atto" | "atto" | "a" | "aF" | "aH" => Ok(Scale::Atto),
            "Femto" | "femto" | "f" | "fF" | "fH" => Ok(Scale::Femto),
            "Pico" | "pico" | "p" | "pF" | "pH" => Ok(Scale::Pico),
            "Nano" | "nano" | "n" | "nF" | "nH" => Ok(Scale::Nano),
            "Micro" | "micro" | "u" | "μ" | "uΩ" | "μΩ" | "uF" | "μF" | "uH" | "μH" => {
                Ok(Scale::Micro)
            }
            "Milli" | "milli" | "m" | "mΩ" | "mF" | "mH" => Ok(Scale::Milli),
            "Centi" | "centi" | "c" | "cΩ" | "cF" | "cH" => Ok(Scale::Centi),
            "Kilo" | "kilo" | "k" | "kΩ" => Ok(Scale::Kilo),
            "Mega" | "mega" | "M" | "MΩ" => Ok(Scale::Mega),
            "Giga" | "giga" | "G" | "GΩ" => Ok(Scale::Giga),
            "Tera" | "tera" | "T" => Ok(Scale::Tera),
            _ => Ok(Scale::Base),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

const VALUE_PATTERN: &str = r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(a|f|p|n|u|μ|m|c|k|M|G|T)?(Ω|ohm|F|H|S|V|A)?\s*$";

fn split_value(s: &str) -> std::result::Result<(f64, Scale), SimpleError> {
    let re = match Regex::new(VALUE_PATTERN) {
        Ok(re) => re,
        Err(err) => bail!("{}", err),
    };
    let Some(caps) = re.captures(s) else {
        bail!("cannot parse value \"{}\"", s)
    };
    let mantissa: f64 = match caps[1].parse() {
        Ok(val) => val,
        Err(_) => bail!("bad number in \"{}\"", s),
    };
    let scale = match caps.get(2) {
        Some(prefix) => Scale::from_str(prefix.as_str()).unwrap_or_default(),
        None => Scale::Base,
    };
    Ok((mantissa, scale))
}

/// Parse an engineering value such as `4.7k`, `10nF` or `2.2 uH`
pub fn parse_value(s: &str) -> Result<f64> {
    let (mantissa, scale) = split_value(s)?;
    Ok(scale.unscale(mantissa))
}

#[cfg(test)]
mod scale_tests {
    use super::*;
    use crate::util::comp_f64;
    use float_cmp::F64Margin;

    #[test]
    fn test_parse_scale() {
        assert_eq!(Scale::Base, Scale::from_str("").unwrap());
        assert_eq!(Scale::Base, Scale::from_str("x").unwrap());
        assert_eq!(Scale::Atto, Scale::from_str("atto").unwrap());
        assert_eq!(Scale::Femto, Scale::from_str("f").unwrap());
        assert_eq!(Scale::Pico, Scale::from_str("pF").unwrap());
        assert_eq!(Scale::Nano, Scale::from_str("nano").unwrap());
        assert_eq!(Scale::Micro, Scale::from_str("μH").unwrap());
        assert_eq!(Scale::Milli, Scale::from_str("m").unwrap());
        assert_eq!(Scale::Kilo, Scale::from_str("kΩ").unwrap());
        assert_eq!(Scale::Mega, Scale::from_str("M").unwrap());
    }

    #[test]
    fn test_parse_value() {
        let margin = F64Margin {
            epsilon: 1e-20,
            ulps: 4,
        };
        let cases = [
            ("4.7k", 4.7e3),
            ("10nF", 10e-9),
            ("2.2 uH", 2.2e-6),
            ("1e3", 1e3),
            ("-5", -5.0),
            ("33pF", 33e-12),
            ("100 mA", 0.1),
            ("50Ω", 50.0),
            (".5M", 5e5),
        ];
        for (text, exemplar) in cases.iter() {
            comp_f64(exemplar, &parse_value(text).unwrap(), margin, "parse_value", text);
        }
        assert!(parse_value("ten").is_err());
        assert!(parse_value("10 x").is_err());
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(Scale::Pico.multiplier(), 1e-12);
        assert_eq!(Scale::Kilo.scale(4700.0), 4.7);
        assert_eq!(Scale::Base.unscale(3.0), 3.0);
    }
}
