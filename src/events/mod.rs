mod event;
mod sink;

pub use event::{
    Event, PayloadConnectMode, PayloadConnectSource, PayloadNodeAdded, PayloadNodeMove,
    PayloadNodeRelabel, PayloadNodeRemoved, PayloadRelationAdded, PayloadRelationPatch,
    PayloadRelationRemoved, PayloadRelationSelect, PayloadViewEnter,
};

pub use sink::{EventLog, EventSink, FnSink};
