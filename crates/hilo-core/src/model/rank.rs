use core::fmt;
use core::str::FromStr;

/// Number of distinct ranks in the shoe.
pub const RANK_COUNT: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ORDERED: [Rank; RANK_COUNT] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Inverse of [`Rank::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < RANK_COUNT {
            Some(Self::ORDERED[index])
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Position in count arrays: `Two` is 0, `Ace` is 12.
    pub const fn index(self) -> usize {
        (self as u8 - 2) as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        f.write_str(text)
    }
}

/// Card-face text that does not name a rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRankError {
    input: String,
}

impl ParseRankError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised card rank '{}'", self.input)
    }
}

impl std::error::Error for ParseRankError {}

impl FromStr for Rank {
    type Err = ParseRankError;

    /// Parses the face text printed on a card (`"2"`..`"10"`, `J`, `Q`, `K`, `A`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rank = match raw.trim().to_ascii_uppercase().as_str() {
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            "A" => Some(Rank::Ace),
            digits => digits
                .parse::<u8>()
                .ok()
                .filter(|value| *value <= 10)
                .and_then(Rank::from_value),
        };
        rank.ok_or_else(|| ParseRankError {
            input: raw.to_string(),
        })
    }
}
