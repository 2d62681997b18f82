use crate::error::{Error, Result};
use crate::oneport::OnePort;
use crate::scale::{Scale, parse_value};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ElemType {
    Capacitor,
    Conductance,
    CurrentSource,
    Inductor,
    #[default]
    Resistor,
    VoltageSource,
}

impl ElemType {
    /// Convert ElemType to String
    pub fn to_str(&self) -> &str {
        match self {
            ElemType::Capacitor => "Capacitor",
            ElemType::Conductance => "Conductance",
            ElemType::CurrentSource => "CurrentSource",
            ElemType::Inductor => "Inductor",
            ElemType::Resistor => "Resistor",
            ElemType::VoltageSource => "VoltageSource",
        }
    }

    /// Leading letter of an element id, SPICE style
    pub fn prefix(&self) -> char {
        match self {
            ElemType::Capacitor => 'C',
            ElemType::Conductance => 'G',
            ElemType::CurrentSource => 'I',
            ElemType::Inductor => 'L',
            ElemType::Resistor => 'R',
            ElemType::VoltageSource => 'V',
        }
    }

    fn from_prefix(c: char) -> Option<ElemType> {
        match c.to_ascii_uppercase() {
            'C' => Some(ElemType::Capacitor),
            'G' => Some(ElemType::Conductance),
            'I' => Some(ElemType::CurrentSource),
            'L' => Some(ElemType::Inductor),
            'R' => Some(ElemType::Resistor),
            'V' => Some(ElemType::VoltageSource),
            _ => None,
        }
    }
}

impl FromStr for ElemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" | "c" | "Cap" | "cap" | "Capacitor" | "capacitor" => Ok(ElemType::Capacitor),
            "G" | "g" | "Cond" | "cond" | "Conductance" | "conductance" => {
                Ok(ElemType::Conductance)
            }
            "I" | "i" | "Isrc" | "isrc" | "CurrentSource" | "current_source" => {
                Ok(ElemType::CurrentSource)
            }
            "L" | "l" | "Ind" | "ind" | "Inductor" | "inductor" => Ok(ElemType::Inductor),
            "R" | "r" | "Res" | "res" | "Resistor" | "resistor" => Ok(ElemType::Resistor),
            "V" | "v" | "Vsrc" | "vsrc" | "VoltageSource" | "voltage_source" => {
                Ok(ElemType::VoltageSource)
            }
            _ => Err(Error::Parse(format!("ElemType {} not recognized", s))),
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A lumped component with its initial condition
///
/// `initial` is the initial current of an inductor and the initial voltage of
/// a capacitor. It is ignored by the other element types.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    id: String,
    elem: ElemType,
    val: f64,
    initial: f64,
}

impl Element {
    pub fn new(id: &str, elem: ElemType, val: f64, initial: f64) -> Element {
        Element {
            id: id.to_string(),
            elem,
            val,
            initial,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elem(&self) -> ElemType {
        self.elem
    }

    pub fn val(&self) -> f64 {
        self.val
    }

    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// s-domain one-port model of the element
    pub fn one_port(&self) -> Result<OnePort> {
        match self.elem {
            ElemType::Capacitor => OnePort::capacitor(self.val, self.initial),
            ElemType::Conductance => Ok(OnePort::conductance(self.val)),
            ElemType::CurrentSource => Ok(OnePort::current_source(self.val)),
            ElemType::Inductor => Ok(OnePort::inductor(self.val, self.initial)),
            ElemType::Resistor => Ok(OnePort::resistor(self.val)),
            ElemType::VoltageSource => Ok(OnePort::voltage_source(self.val)),
        }
    }
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: "R0".to_string(),
            elem: ElemType::Resistor,
            val: 0.0,
            initial: 0.0,
        }
    }
}

/// Parse a netlist style line `<id> <value> [<initial>]`, the element type
/// being given by the first letter of the id
///
/// ```
/// use lcnet::element::{Element, ElemType};
///
/// let c1: Element = "C1 10n 1.5".parse().unwrap();
/// assert_eq!(c1.elem(), ElemType::Capacitor);
/// ```
impl FromStr for Element {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let (id, val, initial) = match fields.as_slice() {
            [id, val] => (*id, *val, None),
            [id, val, initial] => (*id, *val, Some(*initial)),
            _ => {
                return Err(Error::Parse(format!(
                    "expected \"<id> <value> [<initial>]\", found \"{}\"",
                    s
                )));
            }
        };
        let elem = id
            .chars()
            .next()
            .and_then(ElemType::from_prefix)
            .ok_or_else(|| Error::Parse(format!("unknown element id {}", id)))?;
        Ok(Element {
            id: id.to_string(),
            elem,
            val: parse_value(val)?,
            initial: match initial {
                Some(text) => parse_value(text)?,
                None => 0.0,
            },
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.elem, self.val)?;
        if self.initial != 0.0 {
            write!(f, " ({})", self.initial)?;
        }
        Ok(())
    }
}

/// Builder design pattern for Element
///
/// ## Example
/// ```
/// use lcnet::prelude::*;
///
/// let l1 = ElementBuilder::new().id("L1").val_scaled(10.0, Scale::Micro).build();
/// assert_eq!(l1.elem(), ElemType::Inductor);
/// ```
#[derive(Clone, Default)]
pub struct ElementBuilder {
    id: String,
    elem: Option<ElemType>,
    val: f64,
    initial: f64,
}

impl ElementBuilder {
    pub fn new() -> Self {
        ElementBuilder::default()
    }

    /// Provide element id, which also sets the type unless given explicitly
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Provide element type
    pub fn elem(mut self, elem: ElemType) -> Self {
        self.elem = Some(elem);
        self
    }

    /// Provide element value in base unit
    pub fn val(mut self, val: f64) -> Self {
        self.val = val;
        self
    }

    /// Provide element value in scaled unit
    pub fn val_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.val = scale.unscale(val);
        self
    }

    /// Provide element value as text, e.g. `4.7k`
    pub fn val_str(mut self, val: &str) -> Result<Self> {
        self.val = parse_value(val)?;
        Ok(self)
    }

    /// Provide initial inductor current or capacitor voltage
    pub fn initial(mut self, initial: f64) -> Self {
        self.initial = initial;
        self
    }

    pub fn build(self) -> Element {
        let elem = self
            .elem
            .or_else(|| self.id.chars().next().and_then(ElemType::from_prefix))
            .unwrap_or_default();
        let id = match self.id.is_empty() {
            true => format!("{}0", elem.prefix()),
            false => self.id,
        };
        Element {
            id,
            elem,
            val: self.val,
            initial: self.initial,
        }
    }
}

#[cfg(test)]
mod element_tests {
    use super::*;
    use crate::util::{comp_f64, comp_value};
    use crate::value::PortValue;
    use float_cmp::F64Margin;

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-18,
        ulps: 4,
    };

    #[test]
    fn test_elemtype_from_str() {
        assert_eq!(ElemType::from_str("cap").unwrap(), ElemType::Capacitor);
        assert_eq!(ElemType::from_str("G").unwrap(), ElemType::Conductance);
        assert_eq!(ElemType::from_str("vsrc").unwrap(), ElemType::VoltageSource);
        assert!(ElemType::from_str("mlin").is_err());
        assert_eq!(ElemType::Inductor.to_string(), "Inductor");
    }

    #[test]
    fn test_element_from_str() {
        let c1: Element = "C1 10n 1.5".parse().unwrap();
        assert_eq!(c1.id(), "C1");
        assert_eq!(c1.elem(), ElemType::Capacitor);
        comp_f64(&10e-9, &c1.val(), MARGIN, "element_from_str", "val");
        assert_eq!(c1.initial(), 1.5);

        let r2: Element = "R2 4.7k".parse().unwrap();
        comp_f64(&4.7e3, &r2.val(), MARGIN, "element_from_str", "r2");
        assert!("X1 10".parse::<Element>().is_err());
        assert!("R1".parse::<Element>().is_err());
    }

    #[test]
    fn test_builder() {
        let elem = ElementBuilder::new().id("L1").val_scaled(2.0, Scale::Milli).initial(0.5).build();
        assert_eq!(elem.elem(), ElemType::Inductor);
        let port = elem.one_port().unwrap();
        comp_value(
            &PortValue::voltage(-1e-3),
            &port.voc().unwrap(),
            "builder_inductor",
        );

        let default = ElementBuilder::new().elem(ElemType::Capacitor).val(1.0).build();
        assert_eq!(default.id(), "C0");
        let r = ElementBuilder::new().id("R3").val_str("1k").unwrap().build();
        comp_value(&PortValue::impedance(1e3), &r.one_port().unwrap().zoc().unwrap(), "builder_r");
    }
}
