use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Physical print layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintLayout {
    #[default]
    A4,
    Thermal80,
    Thermal58,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown print layout '{0}', expected one of: a4, thermal80, thermal58")]
pub struct UnknownLayout(pub String);

impl FromStr for PrintLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PrintLayout::A4),
            "thermal80" | "80mm" => Ok(PrintLayout::Thermal80),
            "thermal58" | "58mm" => Ok(PrintLayout::Thermal58),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

impl fmt::Display for PrintLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrintLayout::A4 => "a4",
            PrintLayout::Thermal80 => "thermal80",
            PrintLayout::Thermal58 => "thermal58",
        })
    }
}

/// Page geometry and field limits for a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutProfile {
    pub page_size: &'static str,
    pub body_width: &'static str,
    pub font_size_px: u8,
    pub padding_mm: u8,
    pub customer_name_limit: Option<usize>,
    pub material_limit: Option<usize>,
    pub thermal: bool,
}

impl PrintLayout {
    pub fn profile(self) -> LayoutProfile {
        match self {
            PrintLayout::A4 => LayoutProfile {
                page_size: "A4",
                body_width: "190mm",
                font_size_px: 13,
                padding_mm: 10,
                customer_name_limit: None,
                material_limit: None,
                thermal: false,
            },
            PrintLayout::Thermal80 => LayoutProfile {
                page_size: "80mm auto",
                body_width: "72mm",
                font_size_px: 11,
                padding_mm: 4,
                customer_name_limit: Some(32),
                material_limit: Some(20),
                thermal: true,
            },
            PrintLayout::Thermal58 => LayoutProfile {
                page_size: "58mm auto",
                body_width: "50mm",
                font_size_px: 9,
                padding_mm: 2,
                customer_name_limit: Some(22),
                material_limit: Some(14),
                thermal: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("A4".parse::<PrintLayout>(), Ok(PrintLayout::A4));
        assert_eq!("thermal80".parse::<PrintLayout>(), Ok(PrintLayout::Thermal80));
        assert_eq!(" Thermal58 ".parse::<PrintLayout>(), Ok(PrintLayout::Thermal58));
        assert_eq!("58mm".parse::<PrintLayout>(), Ok(PrintLayout::Thermal58));
    }

    #[test]
    fn rejects_unknown_layout() {
        assert_eq!(
            "letter".parse::<PrintLayout>(),
            Err(UnknownLayout("letter".to_string()))
        );
    }

    #[test]
    fn only_thermal_layouts_truncate() {
        assert_eq!(PrintLayout::A4.profile().customer_name_limit, None);
        assert_eq!(PrintLayout::Thermal80.profile().customer_name_limit, Some(32));
        assert_eq!(PrintLayout::Thermal58.profile().customer_name_limit, Some(22));
        assert_eq!(PrintLayout::Thermal58.profile().material_limit, Some(14));
    }

    #[test]
    fn display_round_trips() {
        for layout in [PrintLayout::A4, PrintLayout::Thermal80, PrintLayout::Thermal58] {
            assert_eq!(layout.to_string().parse::<PrintLayout>(), Ok(layout));
        }
    }
}
