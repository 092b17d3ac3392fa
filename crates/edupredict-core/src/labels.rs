//! Display-label to training-token mapping for the categorical features.
//!
//! The trained encoder only recognises the exact tokens it saw during
//! training (`"group B"`, `"free/reduced"`, ...). The UI shows friendlier
//! labels (`"Group B"`, `"Free / Reduced"`). Every categorical field has a
//! closed enum whose variants carry both, so a token can only ever come from
//! these tables.

use std::fmt;
use std::str::FromStr;

/// The categorical request fields, named by their schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    RaceEthnicity,
    ParentalLevelOfEducation,
    Lunch,
    TestPreparationCourse,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Gender,
        Field::RaceEthnicity,
        Field::ParentalLevelOfEducation,
        Field::Lunch,
        Field::TestPreparationCourse,
    ];

    /// Column name expected by the external pipeline.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::RaceEthnicity => "race_ethnicity",
            Self::ParentalLevelOfEducation => "parental_level_of_education",
            Self::Lunch => "lunch",
            Self::TestPreparationCourse => "test_preparation_course",
        }
    }

    /// Caption shown next to the dropdown.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::RaceEthnicity => "Ethnicity Group",
            Self::ParentalLevelOfEducation => "Parental Education",
            Self::Lunch => "Lunch Program",
            Self::TestPreparationCourse => "Test Preparation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Label not present in a field's mapping table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {field} option: {label:?}")]
pub struct UnknownLabel {
    pub field: Field,
    pub label: String,
}

/// A closed set of display choices for one categorical field.
pub trait Choice: Copy + Sized + 'static {
    const FIELD: Field;
    const ALL: &'static [Self];

    /// Human-readable label shown in the UI.
    fn label(&self) -> &'static str;

    /// Exact token the trained encoder expects.
    fn token(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// Position of this choice within [`Choice::ALL`].
    fn index(&self) -> usize {
        let label = self.label();
        Self::ALL
            .iter()
            .position(|c| c.label() == label)
            .unwrap_or(0)
    }
}

macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident => $field:expr,
        { $($variant:ident => ($label:literal, $token:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl Choice for $name {
            const FIELD: Field = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn token(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s).ok_or_else(|| UnknownLabel {
                    field: $field,
                    label: s.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice! {
    Gender => Field::Gender,
    {
        Male => ("Male", "male"),
        Female => ("Female", "female"),
        Other => ("Other / Prefer not to say", "other"),
    }
}

choice! {
    RaceEthnicity => Field::RaceEthnicity,
    {
        GroupA => ("Group A", "group A"),
        GroupB => ("Group B", "group B"),
        GroupC => ("Group C", "group C"),
        GroupD => ("Group D", "group D"),
        GroupE => ("Group E", "group E"),
    }
}

choice! {
    ParentalEducation => Field::ParentalLevelOfEducation,
    {
        AssociatesDegree => ("Associate's Degree", "associate's degree"),
        BachelorsDegree => ("Bachelor's Degree", "bachelor's degree"),
        HighSchool => ("High School Diploma", "high school"),
        MastersDegree => ("Master's Degree", "master's degree"),
        SomeCollege => ("Some College", "some college"),
        SomeHighSchool => ("Some High School", "some high school"),
    }
}

choice! {
    Lunch => Field::Lunch,
    {
        FreeReduced => ("Free / Reduced", "free/reduced"),
        Standard => ("Standard", "standard"),
    }
}

choice! {
    /// `None` is the course outcome "none", not an absent value.
    TestPreparation => Field::TestPreparationCourse,
    {
        None => ("None", "none"),
        Completed => ("Completed", "completed"),
    }
}

/// The `(label, token)` table for a field, in dropdown order.
pub fn mapping(field: Field) -> Vec<(&'static str, &'static str)> {
    fn pairs<C: Choice>() -> Vec<(&'static str, &'static str)> {
        C::ALL.iter().map(|c| (c.label(), c.token())).collect()
    }

    match field {
        Field::Gender => pairs::<Gender>(),
        Field::RaceEthnicity => pairs::<RaceEthnicity>(),
        Field::ParentalLevelOfEducation => pairs::<ParentalEducation>(),
        Field::Lunch => pairs::<Lunch>(),
        Field::TestPreparationCourse => pairs::<TestPreparation>(),
    }
}

/// Look up the token for a display label.
///
/// Returns `None` for a label outside the field's table; there is no fuzzy
/// matching.
pub fn token_for(field: Field, label: &str) -> Option<&'static str> {
    mapping(field)
        .into_iter()
        .find(|(l, _)| *l == label)
        .map(|(_, token)| token)
}

/// Every token the encoder was trained on for a field.
pub fn vocabulary(field: Field) -> Vec<&'static str> {
    mapping(field).into_iter().map(|(_, token)| token).collect()
}
