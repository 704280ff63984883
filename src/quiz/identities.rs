use std::fmt;

use super::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
}

impl TrigFunction {
    pub const ALL: [TrigFunction; 3] = [TrigFunction::Sin, TrigFunction::Cos, TrigFunction::Tan];

    /// The 4 results a question about this function chooses between.
    pub fn answer_family(self) -> [TrigExpr; 4] {
        match self {
            TrigFunction::Sin | TrigFunction::Cos => TrigExpr::SIN_COS_FAMILY,
            TrigFunction::Tan => TrigExpr::TAN_FAMILY,
        }
    }
}

impl fmt::Display for TrigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrigFunction::Sin => "sin",
            TrigFunction::Cos => "cos",
            TrigFunction::Tan => "tan",
        })
    }
}

/// An angle shift of the form `base ± θ`, with the base a multiple of 90°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AngleOffset {
    NegTheta,
    Deg90Minus,
    Deg90Plus,
    Deg180Minus,
    Deg180Plus,
    Deg270Minus,
    Deg270Plus,
    Deg360Minus,
    Deg360Plus,
    DegNeg90Plus,
    DegNeg90Minus,
    DegNeg180Plus,
    DegNeg180Minus,
    DegNeg270Plus,
    DegNeg270Minus,
}

impl AngleOffset {
    pub const ALL: [AngleOffset; 15] = [
        AngleOffset::NegTheta,
        AngleOffset::Deg90Minus,
        AngleOffset::Deg90Plus,
        AngleOffset::Deg180Minus,
        AngleOffset::Deg180Plus,
        AngleOffset::Deg270Minus,
        AngleOffset::Deg270Plus,
        AngleOffset::Deg360Minus,
        AngleOffset::Deg360Plus,
        AngleOffset::DegNeg90Plus,
        AngleOffset::DegNeg90Minus,
        AngleOffset::DegNeg180Plus,
        AngleOffset::DegNeg180Minus,
        AngleOffset::DegNeg270Plus,
        AngleOffset::DegNeg270Minus,
    ];

    /// Base angle in degrees; `NegTheta` is the plain reflection, base 0°.
    pub fn base_degrees(self) -> i32 {
        match self {
            AngleOffset::NegTheta => 0,
            AngleOffset::Deg90Minus | AngleOffset::Deg90Plus => 90,
            AngleOffset::Deg180Minus | AngleOffset::Deg180Plus => 180,
            AngleOffset::Deg270Minus | AngleOffset::Deg270Plus => 270,
            AngleOffset::Deg360Minus | AngleOffset::Deg360Plus => 360,
            AngleOffset::DegNeg90Plus | AngleOffset::DegNeg90Minus => -90,
            AngleOffset::DegNeg180Plus | AngleOffset::DegNeg180Minus => -180,
            AngleOffset::DegNeg270Plus | AngleOffset::DegNeg270Minus => -270,
        }
    }

    /// Whether θ enters the shifted angle with a minus sign.
    pub fn theta_negated(self) -> bool {
        matches!(
            self,
            AngleOffset::NegTheta
                | AngleOffset::Deg90Minus
                | AngleOffset::Deg180Minus
                | AngleOffset::Deg270Minus
                | AngleOffset::Deg360Minus
                | AngleOffset::DegNeg90Minus
                | AngleOffset::DegNeg180Minus
                | AngleOffset::DegNeg270Minus
        )
    }
}

impl fmt::Display for AngleOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AngleOffset::NegTheta => "−θ",
            AngleOffset::Deg90Minus => "90° − θ",
            AngleOffset::Deg90Plus => "90° + θ",
            AngleOffset::Deg180Minus => "180° − θ",
            AngleOffset::Deg180Plus => "180° + θ",
            AngleOffset::Deg270Minus => "270° − θ",
            AngleOffset::Deg270Plus => "270° + θ",
            AngleOffset::Deg360Minus => "360° − θ",
            AngleOffset::Deg360Plus => "360° + θ",
            AngleOffset::DegNeg90Plus => "−90° + θ",
            AngleOffset::DegNeg90Minus => "−90° − θ",
            AngleOffset::DegNeg180Plus => "−180° + θ",
            AngleOffset::DegNeg180Minus => "−180° − θ",
            AngleOffset::DegNeg270Plus => "−270° + θ",
            AngleOffset::DegNeg270Minus => "−270° − θ",
        })
    }
}

/// One of the 8 canonical simplified forms a reduction can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrigExpr {
    Sin,
    NegSin,
    Cos,
    NegCos,
    Tan,
    NegTan,
    Cot,
    NegCot,
}

impl TrigExpr {
    pub const ALL: [TrigExpr; 8] = [
        TrigExpr::Sin,
        TrigExpr::NegSin,
        TrigExpr::Cos,
        TrigExpr::NegCos,
        TrigExpr::Tan,
        TrigExpr::NegTan,
        TrigExpr::Cot,
        TrigExpr::NegCot,
    ];
    pub const SIN_COS_FAMILY: [TrigExpr; 4] = [
        TrigExpr::Sin,
        TrigExpr::NegSin,
        TrigExpr::Cos,
        TrigExpr::NegCos,
    ];
    pub const TAN_FAMILY: [TrigExpr; 4] = [
        TrigExpr::Tan,
        TrigExpr::NegTan,
        TrigExpr::Cot,
        TrigExpr::NegCot,
    ];
}

impl fmt::Display for TrigExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrigExpr::Sin => "sin θ",
            TrigExpr::NegSin => "−sin θ",
            TrigExpr::Cos => "cos θ",
            TrigExpr::NegCos => "−cos θ",
            TrigExpr::Tan => "tan θ",
            TrigExpr::NegTan => "−tan θ",
            TrigExpr::Cot => "1/tan θ",
            TrigExpr::NegCot => "−1/tan θ",
        })
    }
}

// The reduction tables. Values follow from periodicity (360° for sin/cos,
// 180° for tan), the co-function swap at odd multiples of 90°, and the sign
// of the target quadrant, e.g. sin(270° + θ) lands in quadrant IV where the
// "co" branch is negative, hence −cos θ.

static SIN_TABLE: [(AngleOffset, TrigExpr); 15] = {
    use AngleOffset::*;
    [
        (NegTheta, TrigExpr::NegSin),
        (Deg90Minus, TrigExpr::Cos),
        (Deg90Plus, TrigExpr::Cos),
        (Deg180Minus, TrigExpr::Sin),
        (Deg180Plus, TrigExpr::NegSin),
        (Deg270Minus, TrigExpr::NegCos),
        (Deg270Plus, TrigExpr::NegCos),
        (Deg360Minus, TrigExpr::NegSin),
        (Deg360Plus, TrigExpr::Sin),
        (DegNeg90Plus, TrigExpr::NegCos),
        (DegNeg90Minus, TrigExpr::NegCos),
        (DegNeg180Plus, TrigExpr::NegSin),
        (DegNeg180Minus, TrigExpr::Sin),
        (DegNeg270Plus, TrigExpr::Cos),
        (DegNeg270Minus, TrigExpr::Cos),
    ]
};

static COS_TABLE: [(AngleOffset, TrigExpr); 15] = {
    use AngleOffset::*;
    [
        (NegTheta, TrigExpr::Cos),
        (Deg90Minus, TrigExpr::Sin),
        (Deg90Plus, TrigExpr::NegSin),
        (Deg180Minus, TrigExpr::NegCos),
        (Deg180Plus, TrigExpr::NegCos),
        (Deg270Minus, TrigExpr::NegSin),
        (Deg270Plus, TrigExpr::Sin),
        (Deg360Minus, TrigExpr::Cos),
        (Deg360Plus, TrigExpr::Cos),
        (DegNeg90Plus, TrigExpr::Sin),
        (DegNeg90Minus, TrigExpr::NegSin),
        (DegNeg180Plus, TrigExpr::NegCos),
        (DegNeg180Minus, TrigExpr::NegCos),
        (DegNeg270Plus, TrigExpr::NegSin),
        (DegNeg270Minus, TrigExpr::Sin),
    ]
};

static TAN_TABLE: [(AngleOffset, TrigExpr); 15] = {
    use AngleOffset::*;
    [
        (NegTheta, TrigExpr::NegTan),
        (Deg90Minus, TrigExpr::Cot),
        (Deg90Plus, TrigExpr::NegCot),
        (Deg180Minus, TrigExpr::NegTan),
        (Deg180Plus, TrigExpr::Tan),
        (Deg270Minus, TrigExpr::Cot),
        (Deg270Plus, TrigExpr::NegCot),
        (Deg360Minus, TrigExpr::NegTan),
        (Deg360Plus, TrigExpr::Tan),
        (DegNeg90Plus, TrigExpr::NegCot),
        (DegNeg90Minus, TrigExpr::Cot),
        (DegNeg180Plus, TrigExpr::Tan),
        (DegNeg180Minus, TrigExpr::NegTan),
        (DegNeg270Plus, TrigExpr::NegCot),
        (DegNeg270Minus, TrigExpr::Cot),
    ]
};

/// Resolve `function(offset)` to its canonical simplified form.
pub fn lookup(function: TrigFunction, offset: AngleOffset) -> Result<TrigExpr, QuizError> {
    let table = match function {
        TrigFunction::Sin => &SIN_TABLE,
        TrigFunction::Cos => &COS_TABLE,
        TrigFunction::Tan => &TAN_TABLE,
    };
    table
        .iter()
        .find(|(entry_offset, _)| *entry_offset == offset)
        .map(|(_, result)| *result)
        .ok_or(QuizError::UnknownCombination { function, offset })
}

/// A named subset of offsets, used to restrict sampling. Membership is by
/// base angle, with −θ carrying base 0°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum RangeTier {
    ZeroTo180,
    ZeroTo360,
    Neg180To180,
    #[default]
    All,
}

impl RangeTier {
    pub const ALL: [RangeTier; 4] = [
        RangeTier::ZeroTo180,
        RangeTier::ZeroTo360,
        RangeTier::Neg180To180,
        RangeTier::All,
    ];

    pub fn contains(self, offset: AngleOffset) -> bool {
        let base = offset.base_degrees();
        match self {
            RangeTier::ZeroTo180 => (0..=180).contains(&base),
            RangeTier::ZeroTo360 => (0..=360).contains(&base),
            RangeTier::Neg180To180 => (-180..=180).contains(&base),
            RangeTier::All => true,
        }
    }

    pub fn offsets(self) -> Vec<AngleOffset> {
        AngleOffset::ALL
            .iter()
            .copied()
            .filter(|offset| self.contains(*offset))
            .collect()
    }
}

impl fmt::Display for RangeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeTier::ZeroTo180 => "0° – 180°",
            RangeTier::ZeroTo360 => "0° – 360°",
            RangeTier::Neg180To180 => "−180° – 180°",
            RangeTier::All => "All offsets",
        })
    }
}
