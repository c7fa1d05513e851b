use crate::session::DrillConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SetupField {
    #[strum(to_string = "Prep Time (s)")]
    PrepTime,
    #[strum(to_string = "Hold Time (s)")]
    HoldTime,
    #[strum(to_string = "Shoot Frequency (%)")]
    ShootPercent,
    #[strum(to_string = "Number of Arrows")]
    Arrows,
}

impl SetupField {
    pub const ALL: [SetupField; 4] = [
        SetupField::PrepTime,
        SetupField::HoldTime,
        SetupField::ShootPercent,
        SetupField::Arrows,
    ];

    pub fn hint(&self) -> &'static str {
        match self {
            SetupField::PrepTime => "Time to nock arrow and prepare.",
            SetupField::HoldTime => "Exact time at full draw before command.",
            SetupField::ShootPercent => "Chance the trainer will say \"SHOOT\".",
            SetupField::Arrows => "Arrows in this session.",
        }
    }

    /// (min, max, step) used when editing with the arrow keys
    fn range(&self) -> (f64, f64, f64) {
        match self {
            SetupField::PrepTime => (5.0, 30.0, 1.0),
            SetupField::HoldTime => (1.0, 15.0, 0.5),
            SetupField::ShootPercent => (0.0, 100.0, 10.0),
            SetupField::Arrows => (1.0, f64::from(u32::MAX), 1.0),
        }
    }
}

/// Editable drill settings shown on the setup screen
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub config: DrillConfig,
    pub selected: usize,
}

impl SetupForm {
    pub fn new(config: DrillConfig) -> Self {
        Self {
            config,
            selected: 0,
        }
    }

    pub fn selected_field(&self) -> SetupField {
        SetupField::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % SetupField::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + SetupField::ALL.len() - 1) % SetupField::ALL.len();
    }

    pub fn value(&self, field: SetupField) -> f64 {
        match field {
            SetupField::PrepTime => f64::from(self.config.prep_secs),
            SetupField::HoldTime => self.config.hold_secs,
            SetupField::ShootPercent => f64::from(self.config.shoot_percent),
            SetupField::Arrows => f64::from(self.config.arrows),
        }
    }

    pub fn display_value(&self, field: SetupField) -> String {
        match field {
            SetupField::HoldTime => format!("{:.1}", self.config.hold_secs),
            _ => format!("{}", self.value(field)),
        }
    }

    pub fn increase(&mut self) {
        self.adjust(1.0);
    }

    pub fn decrease(&mut self) {
        self.adjust(-1.0);
    }

    /// Move the selected value one step, staying inside the editing range.
    /// A value already outside the range (set from the command line) only
    /// moves back toward it.
    fn adjust(&mut self, direction: f64) {
        let field = self.selected_field();
        let (min, max, step) = field.range();
        let current = self.value(field);
        let stepped = current + direction * step;

        let next = if direction > 0.0 {
            if current >= max {
                current
            } else {
                stepped.clamp(min, max)
            }
        } else if current <= min {
            current
        } else {
            stepped.clamp(min, max)
        };

        match field {
            SetupField::PrepTime => self.config.prep_secs = next.round() as u32,
            SetupField::HoldTime => self.config.hold_secs = next,
            SetupField::ShootPercent => self.config.shoot_percent = next.round() as u32,
            SetupField::Arrows => self.config.arrows = next.round() as u32,
        }
    }
}
