//! Two-port networks.
//!
//! A [`TwoPort`] stores one of six parameter matrices, tagged by [`Form`],
//! together with the internal source pair of that form. Any other form is
//! derived on demand. Port numbers are one based.

mod convert;

use self::convert::{convert_matrix, convert_sources};
use crate::diagnostic::{Diagnosed, Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::matrix::PortMatrix;
use crate::network::{port_index, NetworkRef};
use crate::oneport::OnePort;
use crate::rational::Rational;
use crate::value::{PortValue, Quantity};
use std::{fmt, str::FromStr};

/// Two-port parameter set
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    /// chain, `[V1, I1] = A [V2, -I2]`
    A,
    /// inverse chain, `[V2, -I2] = B [V1, I1] + [V2b, I2b]`
    B,
    /// inverse hybrid, `[I1, V2] = G [V1, I2] + [I1g, V2g]`
    G,
    /// hybrid, `[V1, I2] = H [I1, V2] + [V1h, I2h]`
    H,
    /// admittance, `[I1, I2] = Y [V1, V2] + [I1y, I2y]`
    Y,
    /// impedance, `[V1, V2] = Z [I1, I2] + [V1z, V2z]`
    Z,
}

impl Form {
    pub fn to_str(&self) -> &str {
        match self {
            Form::A => "A",
            Form::B => "B",
            Form::G => "G",
            Form::H => "H",
            Form::Y => "Y",
            Form::Z => "Z",
        }
    }

    pub fn to_long_str(&self) -> &str {
        match self {
            Form::A => "chain",
            Form::B => "inverse chain",
            Form::G => "inverse hybrid",
            Form::H => "hybrid",
            Form::Y => "admittance",
            Form::Z => "impedance",
        }
    }

    /// Quantities of the internal source pair. The A form shares the B
    /// pair `[V2b, I2b]`.
    pub fn source_kinds(&self) -> [Quantity; 2] {
        match self {
            Form::A | Form::B | Form::H => [Quantity::Voltage, Quantity::Current],
            Form::G => [Quantity::Current, Quantity::Voltage],
            Form::Y => [Quantity::Current, Quantity::Current],
            Form::Z => [Quantity::Voltage, Quantity::Voltage],
        }
    }

    /// Quantity of the zero based matrix entry `(i, j)`
    pub fn entry_kind(&self, i: usize, j: usize) -> Quantity {
        match (self, i, j) {
            (Form::Z, _, _) => Quantity::Impedance,
            (Form::Y, _, _) => Quantity::Admittance,
            (Form::A | Form::B, 0, 0) => Quantity::VoltageRatio,
            (Form::A | Form::B, 0, _) => Quantity::Impedance,
            (Form::A | Form::B, _, 0) => Quantity::Admittance,
            (Form::A | Form::B, _, _) => Quantity::CurrentRatio,
            (Form::H, 0, 0) => Quantity::Impedance,
            (Form::H, 0, _) => Quantity::VoltageRatio,
            (Form::H, _, 0) => Quantity::CurrentRatio,
            (Form::H, _, _) => Quantity::Admittance,
            (Form::G, 0, 0) => Quantity::Admittance,
            (Form::G, 0, _) => Quantity::CurrentRatio,
            (Form::G, _, 0) => Quantity::VoltageRatio,
            (Form::G, _, _) => Quantity::Impedance,
        }
    }
}

impl FromStr for Form {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" | "a" | "chain" => Ok(Form::A),
            "B" | "b" | "inverse_chain" => Ok(Form::B),
            "G" | "g" | "inverse_hybrid" => Ok(Form::G),
            "H" | "h" | "hybrid" => Ok(Form::H),
            "Y" | "y" | "admittance" => Ok(Form::Y),
            "Z" | "z" | "impedance" => Ok(Form::Z),
            _ => Err(Error::Parse(format!("Form {} not recognized", s))),
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TwoPort {
    form: Form,
    m: PortMatrix,
    sources: [Rational; 2],
}

impl TwoPort {
    /// Network from a parameter matrix and its source pair, the source
    /// quantities following [`Form::source_kinds`]
    pub fn new(form: Form, m: PortMatrix, sources: [PortValue; 2]) -> Result<TwoPort> {
        if m.nports() != 2 {
            return Err(Error::DimensionMismatch(format!(
                "two-port needs a 2x2 matrix, found {}x{}",
                m.nports(),
                m.nports()
            )));
        }
        let kinds = form.source_kinds();
        sources[0].expect(kinds[0])?;
        sources[1].expect(kinds[1])?;
        let [s1, s2] = sources;
        Ok(TwoPort::raw(form, m, [s1.val().clone(), s2.val().clone()]))
    }

    /// Source free network
    pub fn from_matrix(form: Form, m: PortMatrix) -> Result<TwoPort> {
        let [k1, k2] = form.source_kinds();
        TwoPort::new(form, m, [PortValue::zero(k1), PortValue::zero(k2)])
    }

    fn raw(form: Form, m: PortMatrix, sources: [Rational; 2]) -> TwoPort {
        let [s1, s2] = sources;
        TwoPort {
            form,
            m: m.cancel(),
            sources: [s1.cancel(), s2.cancel()],
        }
    }

    /// Series element between the upper terminals, `B = [[1, -Z], [0, 1]]`
    pub fn series_element(x: &OnePort) -> Result<TwoPort> {
        if x.is_current_source() {
            return Err(Error::IllegalTopology(
                "current source as a series element".to_string(),
            ));
        }
        let mut tp = TwoPort::zseries(&x.zoc()?)?;
        tp.sources = [x.voc()?.val().clone(), Rational::zero()];
        Ok(tp)
    }

    /// Shunt element across the ports, `B = [[1, 0], [-Y, 1]]`
    pub fn shunt_element(x: &OnePort) -> Result<TwoPort> {
        if x.is_voltage_source() {
            return Err(Error::IllegalTopology(
                "voltage source as a shunt element".to_string(),
            ));
        }
        let mut tp = TwoPort::yshunt(&x.ysc()?)?;
        tp.sources = [Rational::zero(), x.isc()?.val().clone()];
        Ok(tp)
    }

    /// Source free series impedance
    pub fn zseries(z: &PortValue) -> Result<TwoPort> {
        z.expect(Quantity::Impedance)?;
        let b = PortMatrix::from_entries(Rational::one(), -z.val(), Rational::zero(), Rational::one());
        TwoPort::from_matrix(Form::B, b)
    }

    /// Source free series admittance
    pub fn yseries(y: &PortValue) -> Result<TwoPort> {
        TwoPort::zseries(&y.expect(Quantity::Admittance)?.recip(Quantity::Impedance)?)
    }

    /// Source free shunt admittance
    pub fn yshunt(y: &PortValue) -> Result<TwoPort> {
        y.expect(Quantity::Admittance)?;
        let b = PortMatrix::from_entries(Rational::one(), Rational::zero(), -y.val(), Rational::one());
        TwoPort::from_matrix(Form::B, b)
    }

    /// Source free shunt impedance
    pub fn zshunt(z: &PortValue) -> Result<TwoPort> {
        TwoPort::yshunt(&z.expect(Quantity::Impedance)?.recip(Quantity::Admittance)?)
    }

    /// Ideal transformer with `V2 = alpha V1`
    pub fn transformer(alpha: f64) -> Result<TwoPort> {
        if alpha == 0.0 {
            return Err(Error::SingularConversion(
                "transformer with zero turns ratio".to_string(),
            ));
        }
        let b = PortMatrix::from_entries(
            Rational::real(alpha),
            Rational::zero(),
            Rational::zero(),
            Rational::real(1.0 / alpha),
        );
        TwoPort::from_matrix(Form::B, b)
    }

    /// Ideal gyrator with `V2 = R I1`
    pub fn gyrator(r: f64) -> Result<TwoPort> {
        if r == 0.0 {
            return Err(Error::SingularConversion(
                "gyrator with zero resistance".to_string(),
            ));
        }
        let b = PortMatrix::from_entries(
            Rational::zero(),
            Rational::real(r),
            Rational::real(1.0 / r),
            Rational::zero(),
        );
        TwoPort::from_matrix(Form::B, b)
    }

    /// Voltage amplifier `[I1, V2] = [[yin, ar], [av, zout]] [V1, I2]`
    ///
    /// `av` is the open circuit forward voltage gain and `ar` the reverse
    /// current ratio. With `ar = 0` the network has no B form and cascades
    /// in A form.
    pub fn voltage_amplifier(
        av: &Rational,
        ar: &Rational,
        yin: &Rational,
        zout: &Rational,
    ) -> Result<TwoPort> {
        if av.is_zero() {
            return Err(Error::SingularConversion(
                "voltage amplifier with zero gain".to_string(),
            ));
        }
        let g = PortMatrix::from_entries(yin.clone(), ar.clone(), av.clone(), zout.clone());
        TwoPort::from_matrix(Form::G, g)
    }

    /// Unilateral amplifier with infinite input and zero output impedance
    pub fn ideal_voltage_amplifier(av: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::voltage_amplifier(&Rational::real(av), &zero, &zero, &zero)
    }

    pub fn voltage_follower() -> Result<TwoPort> {
        TwoPort::ideal_voltage_amplifier(1.0)
    }

    /// Ideal amplifier with voltage gain `av s`
    pub fn ideal_voltage_differentiator(av: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::voltage_amplifier(&Rational::real(av).mul_s(), &zero, &zero, &zero)
    }

    /// Ideal amplifier with voltage gain `av / s`
    pub fn ideal_voltage_integrator(av: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::voltage_amplifier(&Rational::real(av).div_s(), &zero, &zero, &zero)
    }

    /// Current amplifier `[V1, I2] = [[zin, ar], [ai, yout]] [I1, V2]`
    ///
    /// `ai` is the short circuit forward current gain and `ar` the reverse
    /// voltage ratio.
    pub fn current_amplifier(
        ai: &Rational,
        ar: &Rational,
        zin: &Rational,
        yout: &Rational,
    ) -> Result<TwoPort> {
        if ai.is_zero() {
            return Err(Error::SingularConversion(
                "current amplifier with zero gain".to_string(),
            ));
        }
        let h = PortMatrix::from_entries(zin.clone(), ar.clone(), ai.clone(), yout.clone());
        TwoPort::from_matrix(Form::H, h)
    }

    /// Unilateral amplifier with zero input and infinite output impedance
    pub fn ideal_current_amplifier(ai: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::current_amplifier(&Rational::real(ai), &zero, &zero, &zero)
    }

    pub fn current_follower() -> Result<TwoPort> {
        TwoPort::ideal_current_amplifier(1.0)
    }

    /// Ideal amplifier with current gain `ai s`
    pub fn ideal_current_differentiator(ai: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::current_amplifier(&Rational::real(ai).mul_s(), &zero, &zero, &zero)
    }

    /// Ideal amplifier with current gain `ai / s`
    pub fn ideal_current_integrator(ai: f64) -> Result<TwoPort> {
        let zero = Rational::zero();
        TwoPort::current_amplifier(&Rational::real(ai).div_s(), &zero, &zero, &zero)
    }

    /// Inverting op-amp stage with input element `zin` and feedback `zf`,
    /// voltage gain `-Zf / Zin`
    ///
    /// Initial conditions of the elements are ignored.
    pub fn opamp_inverter(zin: &OnePort, zf: &OnePort) -> Result<TwoPort> {
        let z1 = zin.zoc()?;
        let y2 = zf.ysc()?;
        let a11 = -(z1.val() * y2.val());
        let a21 = -y2.val();
        let a = PortMatrix::from_entries(a11, Rational::zero(), a21, Rational::zero());
        TwoPort::from_matrix(Form::A, a)
    }

    /// Inverting integrator, voltage gain `-1 / (s R C)`
    pub fn opamp_integrator(r: f64, c: f64) -> Result<TwoPort> {
        TwoPort::opamp_inverter(&OnePort::resistor(r), &OnePort::capacitor(c, 0.0)?)
    }

    /// Inverting differentiator, voltage gain `-s R C`
    pub fn opamp_differentiator(r: f64, c: f64) -> Result<TwoPort> {
        TwoPort::opamp_inverter(&OnePort::capacitor(c, 0.0)?, &OnePort::resistor(r))
    }

    /// Series `z1` followed by shunt `z2`
    pub fn l_section(z1: &OnePort, z2: &OnePort) -> Result<TwoPort> {
        TwoPort::series_element(z1)?.chain(&TwoPort::shunt_element(z2)?)
    }

    /// Series `z1`, shunt `z2`, series `z3`
    pub fn t_section(z1: &OnePort, z2: &OnePort, z3: &OnePort) -> Result<TwoPort> {
        TwoPort::series_element(z1)?
            .chain(&TwoPort::shunt_element(z2)?)?
            .chain(&TwoPort::series_element(z3)?)
    }

    /// Shunt `z1`, series `z2`, shunt `z3`
    pub fn pi_section(z1: &OnePort, z2: &OnePort, z3: &OnePort) -> Result<TwoPort> {
        TwoPort::shunt_element(z1)?
            .chain(&TwoPort::series_element(z2)?)?
            .chain(&TwoPort::shunt_element(z3)?)
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn matrix(&self) -> &PortMatrix {
        &self.m
    }

    /// Source pair of the stored form
    pub fn sources(&self) -> [PortValue; 2] {
        let [k1, k2] = self.form.source_kinds();
        [
            PortValue::new(k1, self.sources[0].clone()),
            PortValue::new(k2, self.sources[1].clone()),
        ]
    }

    pub fn has_sources(&self) -> bool {
        self.sources.iter().any(|s| !s.is_zero())
    }

    /// Same network in another form, with the diagnostics of the conversion
    pub fn convert(&self, to: Form) -> Result<Diagnosed<TwoPort>> {
        if to == self.form {
            return Ok(Diagnosed::clean(self.clone()));
        }
        let mat = convert_matrix(self.form, to, &self.m)?;
        let sources = match self.has_sources() {
            false => [Rational::zero(), Rational::zero()],
            true => convert_sources(self.form, to, &self.m, &self.sources)?,
        };
        Ok(mat.map(|m| TwoPort::raw(to, m, sources)))
    }

    /// Same network in another form, accepting a degenerate conversion
    pub fn to(&self, to: Form) -> Result<TwoPort> {
        Ok(self.convert(to)?.into_value())
    }

    /// Parameter matrix of any form
    pub fn params(&self, form: Form) -> Result<PortMatrix> {
        Ok(convert_matrix(self.form, form, &self.m)?.into_value())
    }

    /// Single parameter, e.g. `param(Form::Z, 2, 1)` for `Z21`
    pub fn param(&self, form: Form, row: usize, col: usize) -> Result<PortValue> {
        let (i, j) = (port_index(row, 2)?, port_index(col, 2)?);
        let m = self.params(form)?;
        Ok(PortValue::new(form.entry_kind(i, j), m[(i, j)].clone()))
    }

    /// Matrix and source pair of `form`
    fn model(&self, form: Form) -> Result<(PortMatrix, [Rational; 2])> {
        let x = self.to(form)?;
        Ok((x.m, x.sources))
    }

    /// Cascade of `self` followed by `x`, returned in B form
    ///
    /// `B = B(x) B(self)`; the sources of `self` are referred through
    /// `B(x)` and add to those of `x`.
    ///
    /// Networks without a B form, such as ideal amplifiers, cascade in A
    /// form instead with `A = A(self) A(x)`.
    pub fn chain(&self, x: &TwoPort) -> Result<TwoPort> {
        let (b1, s1) = match self.model(Form::B) {
            Ok(model) => model,
            Err(err) => {
                log::debug!("{}, chaining in A form", err);
                return self.chain_a(x);
            }
        };
        let (b2, s2) = match x.model(Form::B) {
            Ok(model) => model,
            Err(err) => {
                log::debug!("{}, chaining in A form", err);
                return self.chain_a(x);
            }
        };
        let referred = b2.dot_vec(&s1);
        let sources = [&referred[0] + &s2[0], &referred[1] + &s2[1]];
        Ok(TwoPort::raw(Form::B, b2.dot(&b1), sources))
    }

    fn chain_a(&self, x: &TwoPort) -> Result<TwoPort> {
        let (a1, s1) = self.model(Form::A)?;
        let (a2, s2) = x.model(Form::A)?;
        let sources = match s1.iter().all(|s| s.is_zero()) {
            true => s2,
            false => {
                let referred = x.params(Form::B)?.dot_vec(&s1);
                [&referred[0] + &s2[0], &referred[1] + &s2[1]]
            }
        };
        Ok(TwoPort::raw(Form::A, a1.dot(&a2), sources))
    }

    pub fn append(&self, x: &TwoPort) -> Result<TwoPort> {
        self.chain(x)
    }

    pub fn prepend(&self, x: &TwoPort) -> Result<TwoPort> {
        x.chain(self)
    }

    fn two_port_operand<'a>(x: NetworkRef<'a>, op: &str) -> Result<&'a TwoPort> {
        match x {
            NetworkRef::Two(tp) => Ok(tp),
            other => Err(Error::UnsupportedOperation(format!(
                "{} connection of a two-port and a {}",
                op, other
            ))),
        }
    }

    /// Sum of the `form` matrices and source pairs
    fn sum_in(&self, x: &TwoPort, form: Form) -> Result<TwoPort> {
        let (m1, s1) = self.model(form)?;
        let (m2, s2) = x.model(form)?;
        let sources = [&s1[0] + &s2[0], &s1[1] + &s2[1]];
        Ok(TwoPort::raw(form, &m1 + &m2, sources))
    }

    /// Parallel connection of both ports, returned in Y form
    pub fn parallel<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<TwoPort> {
        let x = TwoPort::two_port_operand(x.into(), "parallel")?;
        self.sum_in(x, Form::Y)
    }

    /// Series input and parallel output, returned in H form
    pub fn hybrid<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<TwoPort> {
        let x = TwoPort::two_port_operand(x.into(), "hybrid")?;
        self.sum_in(x, Form::H)
    }

    /// Parallel input and series output, not available
    pub fn inverse_hybrid<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<TwoPort> {
        let x: NetworkRef<'a> = x.into();
        Err(Error::UnsupportedOperation(format!(
            "inverse hybrid connection of a two-port and a {}",
            x
        )))
    }

    /// Series connection of both ports, returned in Z form
    ///
    /// The port condition is not enforced by the connection, so the result
    /// always carries a [`DiagnosticKind::SeriesPortCondition`].
    pub fn series<'a>(&self, x: impl Into<NetworkRef<'a>>) -> Result<Diagnosed<TwoPort>> {
        let x = TwoPort::two_port_operand(x.into(), "series")?;
        let sum = self.sum_in(x, Form::Z)?;
        Ok(Diagnosed::with(
            sum,
            vec![Diagnostic::new(
                DiagnosticKind::SeriesPortCondition,
                "series connection of two-ports may violate the port condition",
            )],
        ))
    }

    /// `x` bridging the upper terminals of both ports
    pub fn bridge(&self, x: &OnePort) -> Result<TwoPort> {
        self.parallel(&TwoPort::series_element(x)?)
    }

    /// Port 2 loaded by `x`, seen from port 1
    pub fn load(&self, x: &OnePort) -> Result<OnePort> {
        self.chain(&TwoPort::shunt_element(x)?)?.opencircuit(2)
    }

    /// Port 1 driven by `x`, seen from port 2
    pub fn source(&self, x: &OnePort) -> Result<OnePort> {
        TwoPort::shunt_element(x)?.chain(self)?.opencircuit(1)
    }

    /// Attach `x` across `port` and reduce to the remaining port
    pub fn terminate(&self, x: &OnePort, port: usize) -> Result<OnePort> {
        match port {
            1 => self.source(x),
            2 => self.load(x),
            _ => Err(Error::InvalidPort(port)),
        }
    }

    /// Norton equivalent at the other port with `port` shorted
    pub fn shortcircuit(&self, port: usize) -> Result<OnePort> {
        let q = 1 - port_index(port, 2)?;
        let (y, iy) = self.model(Form::Y)?;
        OnePort::norton(PortValue::admittance(y[(q, q)].clone()), PortValue::current(-&iy[q]))
    }

    /// Thevenin equivalent at the other port with `port` open
    pub fn opencircuit(&self, port: usize) -> Result<OnePort> {
        let q = 1 - port_index(port, 2)?;
        let (z, vz) = self.model(Form::Z)?;
        OnePort::thevenin(PortValue::impedance(z[(q, q)].clone()), PortValue::voltage(vz[q].clone()))
    }

    /// Open circuit voltages of both ports
    pub fn voc(&self) -> Result<[PortValue; 2]> {
        let (_, vz) = self.model(Form::Z)?;
        let [v1, v2] = vz;
        Ok([PortValue::voltage(v1), PortValue::voltage(v2)])
    }

    /// Short circuit currents driven out of both ports
    pub fn isc(&self) -> Result<[PortValue; 2]> {
        let (_, iy) = self.model(Form::Y)?;
        Ok([PortValue::current(-&iy[0]), PortValue::current(-&iy[1])])
    }

    /// Impedance at `port` with the other port open
    pub fn zoc(&self, port: usize) -> Result<PortValue> {
        let p = port_index(port, 2)?;
        Ok(PortValue::impedance(self.params(Form::Z)?[(p, p)].clone()))
    }

    /// Impedance at `port` with the other port shorted
    pub fn zsc(&self, port: usize) -> Result<PortValue> {
        self.ysc(port)?.recip(Quantity::Impedance)
    }

    /// Admittance at `port` with the other port shorted
    pub fn ysc(&self, port: usize) -> Result<PortValue> {
        let p = port_index(port, 2)?;
        Ok(PortValue::admittance(self.params(Form::Y)?[(p, p)].clone()))
    }

    /// Admittance at `port` with the other port open
    pub fn yoc(&self, port: usize) -> Result<PortValue> {
        self.zoc(port)?.recip(Quantity::Admittance)
    }

    /// Transimpedance `Z[out, in]`
    pub fn ztrans(&self, inport: usize, outport: usize) -> Result<PortValue> {
        self.param(Form::Z, outport, inport)
    }

    /// Transadmittance `Y[out, in]`
    pub fn ytrans(&self, inport: usize, outport: usize) -> Result<PortValue> {
        self.param(Form::Y, outport, inport)
    }

    /// Open circuit voltage gain from `inport` to `outport`
    ///
    /// In Y form the forward gain is `-Y21 / Y22`, as `I2 = 0` gives
    /// `Y21 V1 + Y22 V2 = 0`.
    pub fn vgain(&self, inport: usize, outport: usize) -> Result<PortValue> {
        let (i, o) = (port_index(inport, 2)?, port_index(outport, 2)?);
        if i == o {
            return Ok(PortValue::one(Quantity::VoltageRatio));
        }
        let forward = i == 0;
        let val = match (self.form, forward) {
            (Form::A | Form::B, true) => self.params(Form::A)?[(0, 0)].recip()?,
            (Form::A | Form::B, false) => self.params(Form::B)?[(0, 0)].recip()?,
            (Form::G | Form::H, true) => self.params(Form::G)?[(1, 0)].clone(),
            (Form::G | Form::H, false) => self.params(Form::H)?[(0, 1)].clone(),
            (Form::Z, _) => self.m[(o, i)].checked_div(&self.m[(i, i)])?,
            (Form::Y, _) => -self.m[(o, i)].checked_div(&self.m[(o, o)])?,
        };
        Ok(PortValue::voltage_ratio(val))
    }

    /// Short circuit current gain from `inport` to `outport`
    pub fn igain(&self, inport: usize, outport: usize) -> Result<PortValue> {
        let (i, o) = (port_index(inport, 2)?, port_index(outport, 2)?);
        if i == o {
            return Ok(PortValue::one(Quantity::CurrentRatio));
        }
        let forward = i == 0;
        let val = match (self.form, forward) {
            (Form::A | Form::B, true) => -self.params(Form::A)?[(1, 1)].recip()?,
            (Form::A | Form::B, false) => -self.params(Form::B)?[(1, 1)].recip()?,
            (Form::G | Form::H, true) => self.params(Form::H)?[(1, 0)].clone(),
            (Form::G | Form::H, false) => self.params(Form::G)?[(0, 1)].clone(),
            (Form::Z, _) => -self.m[(o, i)].checked_div(&self.m[(o, o)])?,
            (Form::Y, _) => self.m[(o, i)].checked_div(&self.m[(i, i)])?,
        };
        Ok(PortValue::current_ratio(val))
    }

    /// Open circuit voltage at `outport` with `v` applied at `inport`
    pub fn vresponse(&self, v: &PortValue, inport: usize, outport: usize) -> Result<PortValue> {
        v.expect(Quantity::Voltage)?;
        let (i, o) = (port_index(inport, 2)?, port_index(outport, 2)?);
        if i == o {
            return Ok(v.clone());
        }
        let (z, vz) = self.model(Form::Z)?;
        let ratio = z[(o, i)].checked_div(&z[(i, i)])?;
        let out = &vz[o] + &(&(v.val() - &vz[i]) * &ratio);
        Ok(PortValue::voltage(out))
    }

    /// Current into the shorted `outport` with `current` fed into `inport`
    pub fn iresponse(&self, current: &PortValue, inport: usize, outport: usize) -> Result<PortValue> {
        current.expect(Quantity::Current)?;
        let (i, o) = (port_index(inport, 2)?, port_index(outport, 2)?);
        if i == o {
            return Ok(current.clone());
        }
        let (y, iy) = self.model(Form::Y)?;
        let ratio = y[(o, i)].checked_div(&y[(i, i)])?;
        let out = &iy[o] + &(&(current.val() - &iy[i]) * &ratio);
        Ok(PortValue::current(out))
    }

    fn b_params(&self) -> Option<PortMatrix> {
        self.params(Form::B).ok()
    }

    /// Output unaffected by the input, `B12 = B22 = 0`
    pub fn is_buffered(&self) -> bool {
        self.b_params()
            .is_some_and(|b| b[(0, 1)].is_zero() && b[(1, 1)].is_zero())
    }

    /// Reciprocal network, `det(B) = 1`
    pub fn is_bilateral(&self) -> bool {
        self.b_params()
            .is_some_and(|b| b.det().approx_eq(&Rational::one()))
    }

    /// `B11 = B22`
    pub fn is_symmetrical(&self) -> bool {
        self.b_params()
            .is_some_and(|b| b[(0, 0)].approx_eq(&b[(1, 1)]))
    }

    /// Single series element, `B11 = B22 = 1` and `B21 = 0`
    pub fn is_series(&self) -> bool {
        let one = Rational::one();
        self.b_params().is_some_and(|b| {
            b[(0, 0)].approx_eq(&one) && b[(1, 1)].approx_eq(&one) && b[(1, 0)].is_zero()
        })
    }

    /// Single shunt element, `B11 = B22 = 1` and `B12 = 0`
    pub fn is_shunt(&self) -> bool {
        let one = Rational::one();
        self.b_params().is_some_and(|b| {
            b[(0, 0)].approx_eq(&one) && b[(1, 1)].approx_eq(&one) && b[(0, 1)].is_zero()
        })
    }
}

impl fmt::Display for TwoPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} parameters", self.form.to_long_str())?;
        write!(f, "{}", self.m)?;
        let [s1, s2] = self.sources();
        write!(f, "sources: {}, {}", s1, s2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::comp_value;
    use num::complex::c64;

    const FORMS: [Form; 6] = [Form::A, Form::B, Form::G, Form::H, Form::Y, Form::Z];

    fn divider() -> TwoPort {
        TwoPort::l_section(&OnePort::resistor(1.0), &OnePort::resistor(2.0)).unwrap()
    }

    #[test]
    fn test_divider_source() {
        let vs = OnePort::voltage_source(8.0)
            .series(&OnePort::resistor(1.0))
            .unwrap();
        let out = divider().source(&vs).unwrap();
        comp_value(&PortValue::impedance(1.0), &out.zoc().unwrap(), "divider_zoc");
        comp_value(
            &PortValue::voltage(4.0).integrate(),
            &out.voc().unwrap(),
            "divider_voc",
        );
    }

    #[test]
    fn test_divider_load() {
        let out = divider().load(&OnePort::resistor(2.0)).unwrap();
        comp_value(&PortValue::impedance(2.0), &out.zoc().unwrap(), "divider_load");
        assert!(out.voc().unwrap().is_zero());
        assert_eq!(
            divider().terminate(&OnePort::resistor(2.0), 3),
            Err(Error::InvalidPort(3))
        );
    }

    #[test]
    fn test_gains_agree_across_forms() {
        for &form in FORMS.iter() {
            let tp = divider().to(form).unwrap();
            let name = format!("gain_{}", form);
            comp_value(&PortValue::voltage_ratio(2.0 / 3.0), &tp.vgain(1, 2).unwrap(), &name);
            comp_value(&PortValue::voltage_ratio(1.0), &tp.vgain(2, 1).unwrap(), &name);
            comp_value(&PortValue::current_ratio(-1.0), &tp.igain(1, 2).unwrap(), &name);
            comp_value(&PortValue::current_ratio(-2.0 / 3.0), &tp.igain(2, 1).unwrap(), &name);
            comp_value(&PortValue::voltage_ratio(1.0), &tp.vgain(2, 2).unwrap(), &name);
        }
    }

    #[test]
    fn test_sources_survive_conversion() {
        let vs = OnePort::resistor(1.0)
            .series(&OnePort::voltage_source(5.0))
            .unwrap();
        let tp = TwoPort::series_element(&vs)
            .unwrap()
            .chain(&TwoPort::shunt_element(&OnePort::resistor(1.0)).unwrap())
            .unwrap();
        let [v1, v2] = tp.voc().unwrap();
        comp_value(&PortValue::voltage(-5.0).integrate(), &v1, "voc_1");
        assert!(v2.is_zero());
        for &form in FORMS.iter() {
            let [w1, w2] = tp.to(form).unwrap().voc().unwrap();
            comp_value(&v1, &w1, &format!("voc_1_{}", form));
            assert!(w2.eval(c64(0.0, 1.0)).norm() < 1e-12, "voc_2 after {}", form);
        }
    }

    #[test]
    fn test_round_trip() {
        let tp = TwoPort::t_section(
            &OnePort::resistor(1.0),
            &OnePort::capacitor(1e-3, 0.0).unwrap(),
            &OnePort::inductor(1e-3, 0.0),
        )
        .unwrap();
        let a = tp.params(Form::A).unwrap();
        let back = tp.to(Form::B).unwrap().to(Form::A).unwrap();
        assert!(back.matrix().approx_eq(&a));
        let z = tp.params(Form::Z).unwrap();
        let back = tp.to(Form::Y).unwrap().to(Form::Z).unwrap();
        assert!(back.matrix().approx_eq(&z));
    }

    #[test]
    fn test_port_queries() {
        let tp = divider();
        comp_value(&PortValue::impedance(3.0), &tp.zoc(1).unwrap(), "zoc");
        comp_value(&PortValue::impedance(1.0), &tp.zsc(1).unwrap(), "zsc");
        comp_value(&PortValue::admittance(1.0 / 3.0), &tp.yoc(1).unwrap(), "yoc");
        comp_value(&PortValue::impedance(2.0), &tp.ztrans(1, 2).unwrap(), "ztrans");
        comp_value(&PortValue::admittance(-1.0), &tp.ytrans(1, 2).unwrap(), "ytrans");
        assert_eq!(tp.param(Form::H, 1, 2).unwrap().kind(), Quantity::VoltageRatio);
        assert!(tp.zoc(3).is_err());

        let open = tp.opencircuit(2).unwrap();
        comp_value(&PortValue::impedance(3.0), &open.zoc().unwrap(), "opencircuit");
        let short = tp.shortcircuit(2).unwrap();
        comp_value(&PortValue::admittance(1.0), &short.ysc().unwrap(), "shortcircuit");
    }

    #[test]
    fn test_responses() {
        let tp = divider();
        let v = PortValue::voltage(10.0).integrate();
        comp_value(
            &PortValue::voltage(20.0 / 3.0).integrate(),
            &tp.vresponse(&v, 1, 2).unwrap(),
            "vresponse",
        );
        comp_value(
            &PortValue::current(-1.0),
            &tp.iresponse(&PortValue::current(1.0), 1, 2).unwrap(),
            "iresponse",
        );
        assert!(tp.vresponse(&PortValue::current(1.0), 1, 2).is_err());
    }

    #[test]
    fn test_predicates() {
        let series = TwoPort::series_element(&OnePort::resistor(5.0)).unwrap();
        assert!(series.is_series());
        assert!(!series.is_shunt());
        assert!(series.is_bilateral());
        assert!(series.is_symmetrical());

        let shunt = TwoPort::shunt_element(&OnePort::resistor(5.0)).unwrap();
        assert!(shunt.is_shunt());
        assert!(!shunt.is_series());

        let xfmr = TwoPort::transformer(2.0).unwrap();
        assert!(xfmr.is_bilateral());
        assert!(!xfmr.is_symmetrical());
        assert!(!TwoPort::gyrator(50.0).unwrap().is_bilateral());

        let buffer = TwoPort::from_matrix(
            Form::B,
            PortMatrix::from_entries(2.0.into(), 0.0.into(), 1.0.into(), 0.0.into()),
        )
        .unwrap();
        assert!(buffer.is_buffered());
        assert!(!divider().is_buffered());
    }

    #[test]
    fn test_illegal_elements() {
        assert!(matches!(
            TwoPort::series_element(&OnePort::current_source(1.0)),
            Err(Error::IllegalTopology(_))
        ));
        assert!(matches!(
            TwoPort::shunt_element(&OnePort::voltage_source(1.0)),
            Err(Error::IllegalTopology(_))
        ));
        assert!(TwoPort::transformer(0.0).is_err());
    }

    #[test]
    fn test_connections() {
        let series = TwoPort::series_element(&OnePort::resistor(2.0)).unwrap();
        assert!(series
            .convert(Form::Y)
            .unwrap()
            .has(DiagnosticKind::DegenerateConversion));
        let bridged = series.bridge(&OnePort::resistor(2.0)).unwrap();
        assert_eq!(bridged.form(), Form::Y);
        comp_value(&PortValue::admittance(1.0), &bridged.ysc(1).unwrap(), "bridge");
        assert!(bridged.is_series());

        let r = OnePort::resistor(1.0);
        assert!(matches!(
            divider().parallel(&r),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            divider().hybrid(&r),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            divider().inverse_hybrid(&divider()),
            Err(Error::UnsupportedOperation(_))
        ));

        let sum = divider().series(&divider()).unwrap();
        assert!(sum.has(DiagnosticKind::SeriesPortCondition));
        comp_value(&PortValue::impedance(6.0), &sum.value().zoc(1).unwrap(), "series");

        // each divider has H = [[1, 1], [-1, 0.5]]
        let h = divider().hybrid(&divider()).unwrap();
        assert_eq!(h.form(), Form::H);
        comp_value(&PortValue::impedance(2.0), &h.param(Form::H, 1, 1).unwrap(), "h11");
        comp_value(&PortValue::voltage_ratio(2.0), &h.param(Form::H, 1, 2).unwrap(), "h12");
        comp_value(&PortValue::current_ratio(-2.0), &h.param(Form::H, 2, 1).unwrap(), "h21");
        comp_value(&PortValue::admittance(1.0), &h.param(Form::H, 2, 2).unwrap(), "h22");
    }

    #[test]
    fn test_chain_associative() {
        let p1 = divider();
        let p2 = TwoPort::transformer(3.0).unwrap();
        let p3 = TwoPort::pi_section(
            &OnePort::capacitor(1e-6, 0.0).unwrap(),
            &OnePort::inductor(1e-3, 0.0),
            &OnePort::resistor(50.0),
        )
        .unwrap();
        let left = p1.chain(&p2).unwrap().chain(&p3).unwrap();
        let right = p1.chain(&p2.chain(&p3).unwrap()).unwrap();
        assert!(left
            .params(Form::A)
            .unwrap()
            .approx_eq(&right.params(Form::A).unwrap()));
        assert_eq!(p2.prepend(&p1).unwrap(), p1.append(&p2).unwrap());
    }

    #[test]
    fn test_unilateral_h_sources() {
        let h = PortMatrix::from_entries(
            Rational::real(1.0),
            Rational::zero(),
            Rational::real(2.0),
            Rational::real(0.5),
        );
        let tp = TwoPort::new(Form::H, h, [PortValue::voltage(1.0), PortValue::current(0.0)]).unwrap();
        assert!(matches!(tp.to(Form::B), Err(Error::SingularConversion(_))));

        let [v1, v2] = tp.voc().unwrap();
        comp_value(&PortValue::voltage(1.0), &v1, "unilateral_voc_1");
        assert!(v2.eval(c64(0.0, 1.0)).norm() < 1e-12);
        let [i1, i2] = tp.isc().unwrap();
        comp_value(&PortValue::current(1.0), &i1, "unilateral_isc_1");
        comp_value(&PortValue::current(2.0), &i2, "unilateral_isc_2");
        // Z = [[1, 0], [-4, 2]], so V2 = -4 (3 - 1)
        comp_value(
            &PortValue::voltage(-8.0),
            &tp.vresponse(&PortValue::voltage(3.0), 1, 2).unwrap(),
            "unilateral_vresponse",
        );
        comp_value(&PortValue::impedance(2.0), &tp.zoc(2).unwrap(), "unilateral_zoc_2");
    }

    #[test]
    fn test_voltage_amplifiers() {
        let amp = TwoPort::ideal_voltage_amplifier(10.0).unwrap();
        assert_eq!(amp.form(), Form::G);
        assert!(amp.params(Form::B).is_err());
        comp_value(&PortValue::voltage_ratio(10.0), &amp.vgain(1, 2).unwrap(), "amp");

        let cascade = amp.chain(&amp).unwrap();
        assert_eq!(cascade.form(), Form::A);
        comp_value(&PortValue::voltage_ratio(100.0), &cascade.vgain(1, 2).unwrap(), "cascade");

        // zero output impedance drives any load
        let loaded = amp
            .chain(&TwoPort::shunt_element(&OnePort::resistor(50.0)).unwrap())
            .unwrap();
        comp_value(&PortValue::voltage_ratio(10.0), &loaded.vgain(1, 2).unwrap(), "loaded");

        // 1 ohm output impedance into a 1 ohm load halves the gain
        let real = TwoPort::voltage_amplifier(
            &Rational::real(10.0),
            &Rational::zero(),
            &Rational::real(0.01),
            &Rational::real(1.0),
        )
        .unwrap()
        .chain(&TwoPort::shunt_element(&OnePort::resistor(1.0)).unwrap())
        .unwrap();
        comp_value(&PortValue::voltage_ratio(5.0), &real.vgain(1, 2).unwrap(), "real_amp");

        let follower = TwoPort::voltage_follower().unwrap();
        comp_value(&PortValue::voltage_ratio(1.0), &follower.vgain(1, 2).unwrap(), "follower");

        let diff = TwoPort::ideal_voltage_differentiator(2.0).unwrap();
        comp_value(
            &PortValue::voltage_ratio(2.0).differentiate(),
            &diff.vgain(1, 2).unwrap(),
            "differentiator",
        );
        let int = TwoPort::ideal_voltage_integrator(2.0).unwrap();
        comp_value(
            &PortValue::voltage_ratio(2.0).integrate(),
            &int.vgain(1, 2).unwrap(),
            "integrator",
        );
        assert!(matches!(
            TwoPort::ideal_voltage_amplifier(0.0),
            Err(Error::SingularConversion(_))
        ));
    }

    #[test]
    fn test_current_amplifiers() {
        let amp = TwoPort::ideal_current_amplifier(5.0).unwrap();
        assert_eq!(amp.form(), Form::H);
        comp_value(&PortValue::current_ratio(5.0), &amp.igain(1, 2).unwrap(), "amp");
        let follower = TwoPort::current_follower().unwrap();
        comp_value(&PortValue::current_ratio(1.0), &follower.igain(1, 2).unwrap(), "follower");
        let diff = TwoPort::ideal_current_differentiator(3.0).unwrap();
        comp_value(
            &PortValue::current_ratio(3.0).differentiate(),
            &diff.igain(1, 2).unwrap(),
            "differentiator",
        );
        let int = TwoPort::ideal_current_integrator(3.0).unwrap();
        comp_value(
            &PortValue::current_ratio(3.0).integrate(),
            &int.igain(1, 2).unwrap(),
            "integrator",
        );
        assert!(matches!(
            TwoPort::ideal_current_amplifier(0.0),
            Err(Error::SingularConversion(_))
        ));
    }

    #[test]
    fn test_opamp_stages() {
        let inv = TwoPort::opamp_inverter(&OnePort::resistor(1e3), &OnePort::resistor(1e4)).unwrap();
        comp_value(&PortValue::voltage_ratio(-10.0), &inv.vgain(1, 2).unwrap(), "inverter");
        // virtual ground input
        comp_value(&PortValue::impedance(1e3), &inv.zoc(1).unwrap(), "inverter_zin");

        let int = TwoPort::opamp_integrator(1.0, 1.0).unwrap();
        comp_value(
            &PortValue::voltage_ratio(-1.0).integrate(),
            &int.vgain(1, 2).unwrap(),
            "integrator",
        );
        let diff = TwoPort::opamp_differentiator(1.0, 1.0).unwrap();
        comp_value(
            &PortValue::voltage_ratio(-1.0).differentiate(),
            &diff.vgain(1, 2).unwrap(),
            "differentiator",
        );
    }

    #[test]
    fn test_element_family() {
        let r = OnePort::resistor(2.0);
        let series = TwoPort::series_element(&r).unwrap().params(Form::B).unwrap();
        let zs = TwoPort::zseries(&PortValue::impedance(2.0)).unwrap();
        let ys = TwoPort::yseries(&PortValue::admittance(0.5)).unwrap();
        assert!(zs.matrix().approx_eq(&series));
        assert!(ys.matrix().approx_eq(&series));

        let shunt = TwoPort::shunt_element(&r).unwrap().params(Form::B).unwrap();
        let zp = TwoPort::zshunt(&PortValue::impedance(2.0)).unwrap();
        let yp = TwoPort::yshunt(&PortValue::admittance(0.5)).unwrap();
        assert!(zp.matrix().approx_eq(&shunt));
        assert!(yp.matrix().approx_eq(&shunt));

        assert!(matches!(
            TwoPort::zseries(&PortValue::admittance(0.5)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(TwoPort::yseries(&PortValue::admittance(0.0)).is_err());
    }

    #[test]
    fn test_form_from_str() {
        assert_eq!(Form::from_str("hybrid").unwrap(), Form::H);
        assert_eq!(Form::from_str("z").unwrap(), Form::Z);
        assert!(Form::from_str("S").is_err());
        assert_eq!(Form::Y.source_kinds(), [Quantity::Current, Quantity::Current]);
    }
}
