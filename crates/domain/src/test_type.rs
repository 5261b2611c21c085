//! Theory test types.

use serde::{Deserialize, Serialize};

/// A bookable theory test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    Car,
    Motorcycle,
    LgvMultipleChoice,
    LgvHazardPerception,
    LgvCpc,
    LgvCpcConversion,
    PcvMultipleChoice,
    PcvHazardPerception,
    PcvCpc,
    PcvCpcConversion,
    /// Approved driving instructor, part 1.
    AdiPart1,
    AdiHazardPerception,
    /// Enhanced rider scheme.
    Ers,
    /// Approved motorcycle instructor, part 1.
    AmiPart1,
    AdiPart1Dva,
    AmiPart1Dva,
}

impl TestType {
    pub const ALL: [TestType; 16] = [
        TestType::Car,
        TestType::Motorcycle,
        TestType::LgvMultipleChoice,
        TestType::LgvHazardPerception,
        TestType::LgvCpc,
        TestType::LgvCpcConversion,
        TestType::PcvMultipleChoice,
        TestType::PcvHazardPerception,
        TestType::PcvCpc,
        TestType::PcvCpcConversion,
        TestType::AdiPart1,
        TestType::AdiHazardPerception,
        TestType::Ers,
        TestType::AmiPart1,
        TestType::AdiPart1Dva,
        TestType::AmiPart1Dva,
    ];

    /// Returns true for tests only instructors may book.
    pub fn is_instructor(&self) -> bool {
        matches!(
            self,
            TestType::AdiPart1
                | TestType::AdiHazardPerception
                | TestType::Ers
                | TestType::AmiPart1
                | TestType::AdiPart1Dva
                | TestType::AmiPart1Dva
        )
    }

    /// Maps the eligibility service's test-type code, if it is one we book.
    pub fn from_remote(code: &str) -> Option<Self> {
        let test_type = match code.trim().to_ascii_uppercase().as_str() {
            "CAR" => TestType::Car,
            "MOTORCYCLE" => TestType::Motorcycle,
            "LGV-MC" => TestType::LgvMultipleChoice,
            "LGV-HPT" => TestType::LgvHazardPerception,
            "LGV-CPC" => TestType::LgvCpc,
            "LGV-CPC-C" => TestType::LgvCpcConversion,
            "PCV-MC" => TestType::PcvMultipleChoice,
            "PCV-HPT" => TestType::PcvHazardPerception,
            "PCV-CPC" => TestType::PcvCpc,
            "PCV-CPC-C" => TestType::PcvCpcConversion,
            "ADI-P1" => TestType::AdiPart1,
            "ADI-HPT" => TestType::AdiHazardPerception,
            "ERS" => TestType::Ers,
            "AMI-P1" => TestType::AmiPart1,
            "ADI-P1-DVA" => TestType::AdiPart1Dva,
            "AMI-P1-DVA" => TestType::AmiPart1Dva,
            _ => return None,
        };
        Some(test_type)
    }

    /// The eligibility service's code for this test type.
    pub fn remote_code(&self) -> &'static str {
        match self {
            TestType::Car => "Car",
            TestType::Motorcycle => "Motorcycle",
            TestType::LgvMultipleChoice => "LGV-MC",
            TestType::LgvHazardPerception => "LGV-HPT",
            TestType::LgvCpc => "LGV-CPC",
            TestType::LgvCpcConversion => "LGV-CPC-C",
            TestType::PcvMultipleChoice => "PCV-MC",
            TestType::PcvHazardPerception => "PCV-HPT",
            TestType::PcvCpc => "PCV-CPC",
            TestType::PcvCpcConversion => "PCV-CPC-C",
            TestType::AdiPart1 => "ADI-P1",
            TestType::AdiHazardPerception => "ADI-HPT",
            TestType::Ers => "ERS",
            TestType::AmiPart1 => "AMI-P1",
            TestType::AdiPart1Dva => "ADI-P1-DVA",
            TestType::AmiPart1Dva => "AMI-P1-DVA",
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.remote_code())
    }
}
