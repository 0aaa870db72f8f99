// vf-core/src/units.rs

use uom::si::f64::{
    ElectricCurrent as UomElectricCurrent, ElectricPotential as UomElectricPotential,
    ElectricalResistance as UomElectricalResistance,
};

// Public canonical unit types (SI, f64)
pub type Voltage = UomElectricPotential;
pub type Current = UomElectricCurrent;
pub type Resistance = UomElectricalResistance;

#[inline]
pub fn volts(v: f64) -> Voltage {
    use uom::si::electric_potential::volt;
    Voltage::new::<volt>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn ohms(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = volts(12.0);
        let _i = amps(0.2);
        let _r = ohms(60.0);
    }

    #[test]
    fn ohms_law_dimensions() {
        let i: Current = volts(12.0) / ohms(60.0);
        assert!((i.value - 0.2).abs() < 1e-12);

        let v: Voltage = amps(0.2) * ohms(10.0);
        assert!((v.value - 2.0).abs() < 1e-12);
    }
}
