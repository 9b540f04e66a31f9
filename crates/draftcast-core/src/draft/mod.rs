// Draft bookkeeping: picks, draft order, rosters, and the session state.

pub mod order;
pub mod pick;
pub mod roster;
pub mod state;
