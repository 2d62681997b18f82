//! One-port networks in Thevenin or Norton form.
//!
//! Thevenin: `V = Z I + V_T`. Norton: `I = Y V - I_N`. The port current
//! flows into the positive terminal, so `V_T` is the open circuit voltage and
//! `I_N` the short circuit current driven out of the positive terminal.

use crate::error::{Error, Result};
use crate::value::{PortValue, Quantity};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum OnePort {
    Thevenin { z: PortValue, v: PortValue },
    Norton { y: PortValue, i: PortValue },
}

/// Voltage across and current through a load
#[derive(Clone, Debug, PartialEq)]
pub struct Load {
    pub v: PortValue,
    pub i: PortValue,
}

impl OnePort {
    pub fn thevenin(z: PortValue, v: PortValue) -> Result<OnePort> {
        z.expect(Quantity::Impedance)?;
        v.expect(Quantity::Voltage)?;
        Ok(OnePort::Thevenin { z, v })
    }

    pub fn norton(y: PortValue, i: PortValue) -> Result<OnePort> {
        y.expect(Quantity::Admittance)?;
        i.expect(Quantity::Current)?;
        Ok(OnePort::Norton { y, i })
    }

    /// Source free impedance
    pub fn impedance(z: PortValue) -> Result<OnePort> {
        OnePort::thevenin(z, PortValue::zero(Quantity::Voltage))
    }

    /// Source free admittance
    pub fn admittance(y: PortValue) -> Result<OnePort> {
        OnePort::norton(y, PortValue::zero(Quantity::Current))
    }

    pub fn resistor(r: f64) -> OnePort {
        OnePort::Thevenin {
            z: PortValue::impedance(r),
            v: PortValue::zero(Quantity::Voltage),
        }
    }

    pub fn conductance(g: f64) -> OnePort {
        OnePort::Norton {
            y: PortValue::admittance(g),
            i: PortValue::zero(Quantity::Current),
        }
    }

    /// `Z = s L` with the initial current `i0` appearing as a source `-L i0`
    pub fn inductor(l: f64, i0: f64) -> OnePort {
        OnePort::Thevenin {
            z: PortValue::impedance(l).differentiate(),
            v: PortValue::voltage(-l * i0),
        }
    }

    /// `Z = 1 / (s C)` with the initial voltage `v0` appearing as a step
    /// source `v0 / s`
    pub fn capacitor(c: f64, v0: f64) -> Result<OnePort> {
        if c == 0.0 {
            return Err(Error::SingularConversion(
                "capacitor with zero capacitance".to_string(),
            ));
        }
        Ok(OnePort::Thevenin {
            z: PortValue::impedance(1.0 / c).integrate(),
            v: PortValue::voltage(v0).integrate(),
        })
    }

    /// Ideal step voltage source, `Z = 0` and `V = v0 / s`
    pub fn voltage_source(v0: f64) -> OnePort {
        OnePort::Thevenin {
            z: PortValue::zero(Quantity::Impedance),
            v: PortValue::voltage(v0).integrate(),
        }
    }

    /// Ideal step current source, `Y = 0` and `I = i0 / s`
    pub fn current_source(i0: f64) -> OnePort {
        OnePort::Norton {
            y: PortValue::zero(Quantity::Admittance),
            i: PortValue::current(i0).integrate(),
        }
    }

    /// Quartz crystal, motional arm `R1 + L1 + C1` shunted by `C0`
    pub fn crystal(c0: f64, r1: f64, l1: f64, c1: f64) -> Result<OnePort> {
        let motional = OnePort::resistor(r1)
            .series(&OnePort::inductor(l1, 0.0))?
            .series(&OnePort::capacitor(c1, 0.0)?)?;
        motional.parallel(&OnePort::capacitor(c0, 0.0)?)
    }

    /// Ferrite bead, `Rs` in series with `Rp || Cp || Lp`
    pub fn ferrite_bead(rs: f64, rp: f64, cp: f64, lp: f64) -> Result<OnePort> {
        let tank = OnePort::resistor(rp)
            .parallel(&OnePort::capacitor(cp, 0.0)?)?
            .parallel(&OnePort::inductor(lp, 0.0))?;
        OnePort::resistor(rs).series(&tank)
    }

    pub fn is_thevenin(&self) -> bool {
        matches!(self, OnePort::Thevenin { .. })
    }

    pub fn is_norton(&self) -> bool {
        matches!(self, OnePort::Norton { .. })
    }

    /// Thevenin form with zero impedance
    pub fn is_voltage_source(&self) -> bool {
        matches!(self, OnePort::Thevenin { z, .. } if z.is_zero())
    }

    /// Norton form with zero admittance
    pub fn is_current_source(&self) -> bool {
        matches!(self, OnePort::Norton { y, .. } if y.is_zero())
    }

    /// Open circuit impedance
    pub fn zoc(&self) -> Result<PortValue> {
        match self {
            OnePort::Thevenin { z, .. } => Ok(z.clone()),
            OnePort::Norton { y, .. } => y.recip(Quantity::Impedance),
        }
    }

    /// Short circuit admittance
    pub fn ysc(&self) -> Result<PortValue> {
        match self {
            OnePort::Thevenin { z, .. } => z.recip(Quantity::Admittance),
            OnePort::Norton { y, .. } => Ok(y.clone()),
        }
    }

    /// Open circuit voltage
    pub fn voc(&self) -> Result<PortValue> {
        match self {
            OnePort::Thevenin { v, .. } => Ok(v.clone()),
            OnePort::Norton { y, i } => Ok(i.checked_div(y)?.retag(Quantity::Voltage)),
        }
    }

    /// Short circuit current
    pub fn isc(&self) -> Result<PortValue> {
        match self {
            OnePort::Thevenin { z, v } => Ok(v.checked_div(z)?.retag(Quantity::Current)),
            OnePort::Norton { i, .. } => Ok(i.clone()),
        }
    }

    pub fn to_thevenin(&self) -> Result<OnePort> {
        match self {
            OnePort::Thevenin { .. } => Ok(self.clone()),
            OnePort::Norton { y, .. } if y.is_zero() => Err(Error::SingularConversion(
                "ideal current source has no Thevenin equivalent".to_string(),
            )),
            OnePort::Norton { .. } => Ok(OnePort::Thevenin {
                z: self.zoc()?,
                v: self.voc()?,
            }),
        }
    }

    pub fn to_norton(&self) -> Result<OnePort> {
        match self {
            OnePort::Norton { .. } => Ok(self.clone()),
            OnePort::Thevenin { z, .. } if z.is_zero() => Err(Error::SingularConversion(
                "ideal voltage source has no Norton equivalent".to_string(),
            )),
            OnePort::Thevenin { .. } => Ok(OnePort::Norton {
                y: self.ysc()?,
                i: self.isc()?,
            }),
        }
    }

    /// Express `result` in the same form as `self`
    fn same_form(&self, result: OnePort) -> Result<OnePort> {
        match self {
            OnePort::Thevenin { .. } => result.to_thevenin(),
            OnePort::Norton { .. } => result.to_norton(),
        }
    }

    /// Series connection, impedances and voltages adding
    ///
    /// The result takes the form of `self`.
    pub fn series(&self, x: &OnePort) -> Result<OnePort> {
        if self.is_current_source() || x.is_current_source() {
            return Err(Error::IllegalTopology(
                "current source in series".to_string(),
            ));
        }
        let result = if self.is_voltage_source() && x.is_voltage_source() {
            OnePort::Thevenin {
                z: PortValue::zero(Quantity::Impedance),
                v: &self.voc()? + &x.voc()?,
            }
        } else {
            OnePort::Thevenin {
                z: &self.zoc()? + &x.zoc()?,
                v: &self.voc()? + &x.voc()?,
            }
        };
        self.same_form(result)
    }

    /// Parallel connection, admittances and currents adding
    ///
    /// The result takes the form of `self`.
    pub fn parallel(&self, x: &OnePort) -> Result<OnePort> {
        if self.is_voltage_source() || x.is_voltage_source() {
            return Err(Error::IllegalTopology(
                "voltage source in parallel".to_string(),
            ));
        }
        let result = if self.is_current_source() && x.is_current_source() {
            OnePort::Norton {
                y: PortValue::zero(Quantity::Admittance),
                i: &self.isc()? + &x.isc()?,
            }
        } else {
            OnePort::Norton {
                y: &self.ysc()? + &x.ysc()?,
                i: &self.isc()? + &x.isc()?,
            }
        };
        self.same_form(result)
    }

    /// Voltage across `x` in parallel and current through `x` in series
    pub fn load(&self, x: &OnePort) -> Result<Load> {
        Ok(Load {
            v: self.parallel(x)?.voc()?,
            i: self.series(x)?.isc()?,
        })
    }

    /// Alternate parallel and series connections, starting with parallel
    ///
    /// `a.parallel_ladder(&[b, c, d])` is `((a | b) + c) | d`.
    pub fn parallel_ladder(&self, args: &[OnePort]) -> Result<OnePort> {
        args.iter()
            .enumerate()
            .try_fold(self.clone(), |acc, (m, x)| match m % 2 {
                0 => acc.parallel(x),
                _ => acc.series(x),
            })
    }

    /// `z0` in series, then `z1` across, `(self + z0) | z1`
    pub fn parallel_l(&self, z0: &OnePort, z1: &OnePort) -> Result<OnePort> {
        self.series(z0)?.parallel(z1)
    }

    /// `z0` and `z2` in the two legs, then `z1` across,
    /// `(self + z0 + z2) | z1`
    pub fn parallel_c(&self, z0: &OnePort, z1: &OnePort, z2: &OnePort) -> Result<OnePort> {
        self.series(z0)?.series(z2)?.parallel(z1)
    }

    /// Pi network, `((self | z0) + z1) | z2`
    pub fn parallel_pi(&self, z0: &OnePort, z1: &OnePort, z2: &OnePort) -> Result<OnePort> {
        self.parallel_ladder(&[z0.clone(), z1.clone(), z2.clone()])
    }

    /// T network, `((self + z0) | z1) + z2`
    pub fn parallel_t(&self, z0: &OnePort, z1: &OnePort, z2: &OnePort) -> Result<OnePort> {
        self.series(z0)?.parallel(z1)?.series(z2)
    }
}

impl fmt::Display for OnePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnePort::Thevenin { z, v } => write!(f, "Thevenin({}, {})", z, v),
            OnePort::Norton { y, i } => write!(f, "Norton({}, {})", y, i),
        }
    }
}

/// Star equivalent of a delta of impedances, `Zk = Za Zb / (Z1 + Z2 + Z3)`
/// over the two delta arms meeting at node k
pub fn delta_to_wye(
    z1: &PortValue,
    z2: &PortValue,
    z3: &PortValue,
) -> Result<(PortValue, PortValue, PortValue)> {
    let sum = &(z1 + z2) + z3;
    Ok((
        (z2 * z3).checked_div(&sum)?,
        (z3 * z1).checked_div(&sum)?,
        (z1 * z2).checked_div(&sum)?,
    ))
}

/// Delta equivalent of a star of impedances, `Zk = (Z1 Z2 + Z2 Z3 + Z3 Z1) / Zk`
pub fn wye_to_delta(
    z1: &PortValue,
    z2: &PortValue,
    z3: &PortValue,
) -> Result<(PortValue, PortValue, PortValue)> {
    let zz = PortValue::new(
        z1.kind(),
        &(&(z1.val() * z2.val()) + &(z2.val() * z3.val())) + &(z3.val() * z1.val()),
    );
    let part = |z: &PortValue| -> Result<PortValue> {
        Ok(PortValue::new(z1.kind(), zz.val().checked_div(z.val())?))
    };
    Ok((part(z1)?, part(z2)?, part(z3)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Root;
    use crate::util::comp_roots;
    use float_cmp::F64Margin;
    use num::complex::c64;

    #[test]
    fn test_component_values() {
        assert!(OnePort::resistor(7.0).zoc().unwrap().approx_eq(&PortValue::impedance(7.0)));
        let c = OnePort::capacitor(2.0, 3.0).unwrap();
        assert!(c.zoc().unwrap().approx_eq(&PortValue::impedance(0.5).integrate()));
        assert!(c.voc().unwrap().approx_eq(&PortValue::voltage(3.0).integrate()));
        let l = OnePort::inductor(2.0, 1.5);
        assert!(l.voc().unwrap().approx_eq(&PortValue::voltage(-3.0)));
        assert!(OnePort::capacitor(0.0, 0.0).is_err());
    }

    #[test]
    fn test_source_forms() {
        assert!(OnePort::voltage_source(5.0).is_voltage_source());
        assert!(OnePort::current_source(2.0).is_current_source());
        assert!(OnePort::voltage_source(5.0).to_norton().is_err());
        assert!(OnePort::current_source(2.0).to_thevenin().is_err());
    }

    #[test]
    fn test_norton_round_trip() {
        let th = OnePort::resistor(4.0).series(&OnePort::voltage_source(8.0)).unwrap();
        let n = th.to_norton().unwrap();
        assert!(n.ysc().unwrap().approx_eq(&PortValue::admittance(0.25)));
        assert!(n.isc().unwrap().approx_eq(&PortValue::current(2.0).integrate()));
        let back = n.to_thevenin().unwrap();
        assert!(back.voc().unwrap().approx_eq(&th.voc().unwrap()));
    }

    #[test]
    fn test_wye_delta() {
        let z = PortValue::impedance(3.0);
        let (a, b, c) = delta_to_wye(&z, &z, &z).unwrap();
        assert!(a.approx_eq(&PortValue::impedance(1.0)));
        assert!(b.approx_eq(&c));
        let (d, _, _) = wye_to_delta(&a, &b, &c).unwrap();
        assert!(d.approx_eq(&z));
    }

    #[test]
    fn test_load() {
        let src = OnePort::voltage_source(10.0)
            .series(&OnePort::resistor(1.0))
            .unwrap();
        let load = src.load(&OnePort::resistor(1.0)).unwrap();
        assert!(load.v.approx_eq(&PortValue::voltage(5.0).integrate()));
        assert!(load.i.approx_eq(&PortValue::current(5.0).integrate()));
    }

    #[test]
    fn test_ladders() {
        let r = OnePort::resistor(1.0);
        let z = |x: Result<OnePort>| x.unwrap().zoc().unwrap();
        assert!(z(r.parallel_l(&r, &r)).approx_eq(&PortValue::impedance(2.0 / 3.0)));
        assert!(z(r.parallel_c(&r, &r, &r)).approx_eq(&PortValue::impedance(0.75)));
        assert!(z(r.parallel_pi(&r, &r, &r)).approx_eq(&PortValue::impedance(0.6)));
        assert!(z(r.parallel_t(&r, &r, &r)).approx_eq(&PortValue::impedance(5.0 / 3.0)));

        // (((1 | 2) + 3) | 4) + 5
        let ladder = r
            .parallel_ladder(&[
                OnePort::resistor(2.0),
                OnePort::resistor(3.0),
                OnePort::resistor(4.0),
                OnePort::resistor(5.0),
            ])
            .unwrap();
        let inner = 2.0 / 3.0 + 3.0;
        let expected = inner * 4.0 / (inner + 4.0) + 5.0;
        assert!(ladder.zoc().unwrap().approx_eq(&PortValue::impedance(expected)));
    }

    #[test]
    fn test_crystal_resonances() {
        // Z = (s^2 + 1) / (s (s^2 + 2))
        let xtal = OnePort::crystal(1.0, 0.0, 1.0, 1.0).unwrap();
        let z = xtal.zoc().unwrap();
        let margin = F64Margin {
            epsilon: 1e-9,
            ulps: 4,
        };
        comp_roots(
            &[Root::new(c64(0.0, 1.0), 1), Root::new(c64(0.0, -1.0), 1)],
            &z.zeros(),
            margin,
            "crystal_series",
        );
        comp_roots(
            &[
                Root::new(c64(0.0, 0.0), 1),
                Root::new(c64(0.0, 2.0_f64.sqrt()), 1),
                Root::new(c64(0.0, -(2.0_f64.sqrt())), 1),
            ],
            &z.poles(),
            margin,
            "crystal_parallel",
        );
    }

    #[test]
    fn test_ferrite_bead() {
        let bead = OnePort::ferrite_bead(1.0, 1.0, 1.0, 1.0).unwrap();
        let z = bead.zoc().unwrap();
        assert!((z.eval(c64(0.0, 0.0)) - c64(1.0, 0.0)).norm() < 1e-12);
        // tank resonance at 1 rad/s leaves Rs + Rp
        assert!((z.eval(c64(0.0, 1.0)) - c64(2.0, 0.0)).norm() < 1e-12);
    }
}
