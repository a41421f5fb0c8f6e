/// Categorical columns the analytics endpoint may group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Publisher,
    Bundle,
    Brand,
    Model,
    AdType,
    BidFloor,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Publisher,
        Dimension::Bundle,
        Dimension::Brand,
        Dimension::Model,
        Dimension::AdType,
        Dimension::BidFloor,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Publisher => "publisher",
            Dimension::Bundle => "bundle",
            Dimension::Brand => "brand",
            Dimension::Model => "model",
            Dimension::AdType => "ad_type",
            Dimension::BidFloor => "bid_floor",
        }
    }

    // only path by which an identifier reaches SQL text
    pub fn column(self) -> &'static str {
        // external names currently mirror the column names one to one
        self.name()
    }
}
