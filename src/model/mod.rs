#[macro_use]
mod macros;

pub mod arc;
pub mod calendar;
pub mod district;
pub mod drift;
pub mod economy;
pub mod environment;
pub mod legislature;
pub mod population;
pub mod world;

pub use arc::{
    AppliedIntervention, ArcIntervention, ArcPhase, ArcType, Domain, InterventionCommand,
    ResolutionType, StoryArc,
};
pub use calendar::{Calendar, Holiday, HolidayPriority, Season, SportsPhase};
pub use district::DistrictMetrics;
pub use drift::DriftState;
pub use economy::{
    CalendarSnapshot, DistrictEconomy, EconomicRipple, EconomyState, MoodDescriptor,
    RippleTrigger,
};
pub use environment::{CityEvent, Environment, Weather, WorkforceSignals};
pub use legislature::{
    CouncilSeat, CouncilState, Faction, Initiative, InitiativeKind, InitiativeStatus, SwingVote,
    VoteTally,
};
pub use population::PopulationRecord;
pub use world::WorldState;
