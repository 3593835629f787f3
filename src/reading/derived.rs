//! Variables computed from other columns when a station does not report them.

pub const NET_RADIATION: &str = "NETRAD";
pub const ALBEDO: &str = "ALB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    /// `(LW_IN - LW_OUT) + (SW_IN - SW_OUT)`
    NetRadiation,
    /// `SW_OUT / SW_IN * 100`, from 0 to 100.
    Albedo,
}

impl Derived {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            NET_RADIATION => Some(Derived::NetRadiation),
            ALBEDO => Some(Derived::Albedo),
            _ => None,
        }
    }

    /// Columns the value is computed from, in the order [`Derived::compute`]
    /// takes them.
    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            Derived::NetRadiation => &["LW_IN", "LW_OUT", "SW_IN", "SW_OUT"],
            Derived::Albedo => &["SW_IN", "SW_OUT"],
        }
    }

    /// `None` when the result is undefined, such as albedo with no incoming
    /// shortwave radiation.
    pub fn compute(&self, inputs: &[f64]) -> Option<f64> {
        match (self, inputs) {
            (Derived::NetRadiation, [lw_in, lw_out, sw_in, sw_out]) => {
                Some((lw_in - lw_out) + (sw_in - sw_out))
            }
            (Derived::Albedo, [sw_in, sw_out]) if *sw_in != 0.0 => Some(sw_out / sw_in * 100.0),
            _ => None,
        }
    }
}

// -- Tests -------------------------------------------------------------------
