use crate::parser::Component;

/// Closed interval of accepted values for a component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub description: &'static str,
}

impl ValueRange {
    const fn new(min: f64, max: f64, description: &'static str) -> Self {
        Self {
            min,
            max,
            description,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_boundary(&self, value: f64) -> bool {
        value == self.min || value == self.max
    }
}

/// `None` for block markers, which carry no value.
pub fn value_range(component: Component) -> Option<ValueRange> {
    let range = match component {
        Component::Base => ValueRange::new(0.0, 360.0, "rotates from 0 to 360 degrees"),
        Component::Hombro => ValueRange::new(0.0, 180.0, "rotates from 0 to 180 degrees"),
        Component::Codo => ValueRange::new(0.0, 180.0, "rotates from 0 to 180 degrees"),
        Component::Garra => ValueRange::new(0.0, 90.0, "opens and closes from 0 to 90 degrees"),
        Component::Muneca => ValueRange::new(0.0, 360.0, "rotates from 0 to 360 degrees"),
        Component::Velocidad => ValueRange::new(0.1, 10.0, "speed factor"),
        Component::Repetir => ValueRange::new(1.0, 100.0, "repetitions of the next block"),
        Component::Espera => ValueRange::new(0.1, 60.0, "pause in seconds"),
        Component::Inicio | Component::Fin => return None,
    };
    Some(range)
}
