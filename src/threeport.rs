//! Three-port networks referenced to a common ground.
//!
//! The network is held as a 3x3 admittance or impedance matrix plus the open
//! circuit voltages of the ports:
//!
//! `V = Z I + Voc`, equivalently `I = Y V - Isc` with `Isc = Y Voc`.

use crate::diagnostic::{Diagnosed, Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::matrix::PortMatrix;
use crate::network::{port_index, NetworkRef};
use crate::oneport::OnePort;
use crate::rational::Rational;
use crate::twoport::{Form, TwoPort};
use crate::value::{PortValue, Quantity};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct ThreePort {
    form: Form,
    m: PortMatrix,
    voc: [Rational; 3],
}

impl ThreePort {
    /// Network from an admittance or impedance matrix and the open circuit
    /// voltages
    pub fn new(form: Form, m: PortMatrix, voc: [PortValue; 3]) -> Result<ThreePort> {
        if !matches!(form, Form::Y | Form::Z) {
            return Err(Error::UnsupportedOperation(format!(
                "three-port in {} form",
                form.to_long_str()
            )));
        }
        if m.nports() != 3 {
            return Err(Error::DimensionMismatch(format!(
                "three-port needs a 3x3 matrix, found {}x{}",
                m.nports(),
                m.nports()
            )));
        }
        for v in voc.iter() {
            v.expect(Quantity::Voltage)?;
        }
        let [v1, v2, v3] = voc;
        Ok(ThreePort {
            form,
            m: m.cancel(),
            voc: [v1.val().clone(), v2.val().clone(), v3.val().clone()],
        })
    }

    /// Source free network
    pub fn from_matrix(form: Form, m: PortMatrix) -> Result<ThreePort> {
        let zero = PortValue::zero(Quantity::Voltage);
        ThreePort::new(form, m, [zero.clone(), zero.clone(), zero])
    }

    /// Impedance form with the open circuit voltages `Z Isc`
    fn from_y_isc(y: &PortMatrix, isc: &[Rational]) -> Result<ThreePort> {
        let z = y.inv()?;
        let voc = z.dot_vec(isc);
        Ok(ThreePort {
            form: Form::Z,
            m: z.cancel(),
            voc: [voc[0].cancel(), voc[1].cancel(), voc[2].cancel()],
        })
    }

    /// Op-amp macro model
    ///
    /// Ports are the non-inverting input, the inverting input and the
    /// output. `rd` is the differential input resistance, `ro` the output
    /// resistance, `a` the open loop gain, `rp` and `rm` the common mode
    /// resistances of the two inputs.
    pub fn opamp(rd: f64, ro: f64, a: f64, rp: f64, rm: f64) -> Result<ThreePort> {
        let total = rp + rd + rm;
        if total == 0.0 {
            return Err(Error::SingularConversion(
                "op-amp with zero input resistance".to_string(),
            ));
        }
        let ra = rp * (rd + rm) / total;
        let rb = rm * (rd + rp) / total;
        let vals = [
            [rp + rd, rd, 0.0],
            [rd, rm + rd, 0.0],
            [a * ra, -a * rb, ro],
        ];
        ThreePort::from_matrix(
            Form::Z,
            PortMatrix::from_fn(3, |(i, j)| Rational::real(vals[i][j])),
        )
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn matrix(&self) -> &PortMatrix {
        &self.m
    }

    pub fn yparams(&self) -> Result<PortMatrix> {
        match self.form {
            Form::Y => Ok(self.m.clone()),
            _ => self.m.inv(),
        }
    }

    pub fn zparams(&self) -> Result<PortMatrix> {
        match self.form {
            Form::Z => Ok(self.m.clone()),
            _ => self.m.inv(),
        }
    }

    pub fn voc(&self) -> [PortValue; 3] {
        let [v1, v2, v3] = self.voc.clone();
        [
            PortValue::voltage(v1),
            PortValue::voltage(v2),
            PortValue::voltage(v3),
        ]
    }

    fn isc_vec(&self) -> Result<Vec<Rational>> {
        Ok(self.yparams()?.dot_vec(&self.voc))
    }

    /// Short circuit currents driven out of the ports, `Y Voc`
    pub fn isc(&self) -> Result<[PortValue; 3]> {
        let isc = self.isc_vec()?;
        Ok([
            PortValue::current(isc[0].clone()),
            PortValue::current(isc[1].clone()),
            PortValue::current(isc[2].clone()),
        ])
    }

    /// Impedance at `port` with the other ports open
    pub fn zoc(&self, port: usize) -> Result<PortValue> {
        let p = port_index(port, 3)?;
        Ok(PortValue::impedance(self.zparams()?[(p, p)].clone()))
    }

    /// Admittance at `port` with the other ports shorted
    pub fn ysc(&self, port: usize) -> Result<PortValue> {
        let p = port_index(port, 3)?;
        Ok(PortValue::admittance(self.yparams()?[(p, p)].clone()))
    }

    pub fn yoc(&self, port: usize) -> Result<PortValue> {
        self.zoc(port)?.recip(Quantity::Admittance)
    }

    pub fn zsc(&self, port: usize) -> Result<PortValue> {
        self.ysc(port)?.recip(Quantity::Impedance)
    }

    /// One-port `x` connected across `port`
    pub fn attach_parallel(&self, x: &OnePort, port: usize) -> Result<ThreePort> {
        let p = port_index(port, 3)?;
        if x.is_voltage_source() {
            return Err(Error::IllegalTopology(
                "voltage source in parallel with a port".to_string(),
            ));
        }
        let y = self.yparams()?;
        let y = y.with_entry(p, p, &y[(p, p)] + x.ysc()?.val());
        let mut isc = self.isc_vec()?;
        isc[p] = &isc[p] + x.isc()?.val();
        ThreePort::from_y_isc(&y, &isc)
    }

    /// One-port `x` connected between the upper terminals of `inport` and
    /// `outport`
    pub fn bridge(&self, x: &OnePort, inport: usize, outport: usize) -> Result<ThreePort> {
        let idx = [port_index(inport, 3)?, port_index(outport, 3)?];
        if idx[0] == idx[1] {
            return Err(Error::InvalidPort(outport));
        }
        let element = TwoPort::series_element(x)?;
        let block = element.params(Form::Y)?.embed(3, idx);
        let y = &self.yparams()? + &block;
        let element_isc = element.isc()?;
        let mut isc = self.isc_vec()?;
        for (k, &p) in idx.iter().enumerate() {
            isc[p] = &isc[p] + element_isc[k].val();
        }
        ThreePort::from_y_isc(&y, &isc)
    }

    fn three_port_operand<'a>(x: NetworkRef<'a>, op: &str) -> Result<&'a ThreePort> {
        match x {
            NetworkRef::Three(tp) => Ok(tp),
            other => Err(Error::UnsupportedOperation(format!(
                "{} connection of a three-port and a {}",
                op, other
            ))),
        }
    }

    /// Ports connected in parallel, admittances and short circuit currents
    /// adding
    pub fn parallel<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<ThreePort> {
        let x = ThreePort::three_port_operand(x.into(), "parallel")?;
        let y = &self.yparams()? + &x.yparams()?;
        let isc: Vec<Rational> = self
            .isc_vec()?
            .iter()
            .zip(x.isc_vec()?.iter())
            .map(|(a, b)| a + b)
            .collect();
        ThreePort::from_y_isc(&y, &isc)
    }

    /// Ports connected in series, impedances and open circuit voltages adding
    pub fn series<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<Diagnosed<ThreePort>> {
        let x = ThreePort::three_port_operand(x.into(), "series")?;
        let z = &self.zparams()? + &x.zparams()?;
        let sum = ThreePort {
            form: Form::Z,
            m: z.cancel(),
            voc: [
                &self.voc[0] + &x.voc[0],
                &self.voc[1] + &x.voc[1],
                &self.voc[2] + &x.voc[2],
            ],
        };
        Ok(Diagnosed::with(
            sum,
            vec![Diagnostic::new(
                DiagnosticKind::SeriesPortCondition,
                "series connection of three-ports may violate the port condition",
            )],
        ))
    }

    /// Two-port left by shorting `port`, in Y form
    pub fn shortcircuit(&self, port: usize) -> Result<TwoPort> {
        let p = port_index(port, 3)?;
        let y = self.yparams()?.remove_port(p);
        let iy: Vec<Rational> = self
            .isc_vec()?
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != p)
            .map(|(_, i)| -i)
            .collect();
        TwoPort::new(
            Form::Y,
            y,
            [PortValue::current(iy[0].clone()), PortValue::current(iy[1].clone())],
        )
    }

    /// Two-port left by opening `port`, in Z form
    pub fn opencircuit(&self, port: usize) -> Result<TwoPort> {
        let p = port_index(port, 3)?;
        let z = self.zparams()?.remove_port(p);
        let vz: Vec<&Rational> = self
            .voc
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != p)
            .map(|(_, v)| v)
            .collect();
        TwoPort::new(
            Form::Z,
            z,
            [PortValue::voltage(vz[0].clone()), PortValue::voltage(vz[1].clone())],
        )
    }

    /// Load `port` with `x` and reduce to the other two ports
    pub fn terminate(&self, x: &OnePort, port: usize) -> Result<TwoPort> {
        self.attach_parallel(x, port)?.opencircuit(port)
    }

    /// Open circuit voltage gain from `inport` to `outport`
    pub fn vgain(&self, inport: usize, outport: usize) -> Result<PortValue> {
        let (i, o) = (port_index(inport, 3)?, port_index(outport, 3)?);
        let z = self.zparams()?;
        Ok(PortValue::voltage_ratio(z[(o, i)].checked_div(&z[(i, i)])?))
    }

    /// Short circuit current gain from `inport` to `outport`
    pub fn igain(&self, inport: usize, outport: usize) -> Result<PortValue> {
        let (i, o) = (port_index(inport, 3)?, port_index(outport, 3)?);
        let y = self.yparams()?;
        Ok(PortValue::current_ratio(y[(o, i)].checked_div(&y[(i, i)])?))
    }

    /// Open circuit voltage at `outport` with `v` applied at `inport`
    pub fn vresponse(&self, v: &PortValue, inport: usize, outport: usize) -> Result<PortValue> {
        v.expect(Quantity::Voltage)?;
        let (i, o) = (port_index(inport, 3)?, port_index(outport, 3)?);
        if i == o {
            return Ok(v.clone());
        }
        let z = self.zparams()?;
        let ratio = z[(o, i)].checked_div(&z[(i, i)])?;
        let out = &self.voc[o] + &(&(v.val() - &self.voc[i]) * &ratio);
        Ok(PortValue::voltage(out))
    }

    /// Current into the shorted `outport` with `current` fed into `inport`
    pub fn iresponse(&self, current: &PortValue, inport: usize, outport: usize) -> Result<PortValue> {
        current.expect(Quantity::Current)?;
        let (i, o) = (port_index(inport, 3)?, port_index(outport, 3)?);
        if i == o {
            return Ok(current.clone());
        }
        let y = self.yparams()?;
        let isc = self.isc_vec()?;
        let ratio = y[(o, i)].checked_div(&y[(i, i)])?;
        let out = &(&(current.val() + &isc[i]) * &ratio) - &isc[o];
        Ok(PortValue::current(out))
    }
}

impl fmt::Display for ThreePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "three-port {} parameters", self.form.to_long_str())?;
        write!(f, "{}", self.m)?;
        let [v1, v2, v3] = self.voc();
        write!(f, "open circuit: {}, {}, {}", v1, v2, v3)
    }
}
