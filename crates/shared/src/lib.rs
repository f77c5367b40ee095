//! Types shared between the coachboard client and the coaching gateway.

pub mod protocol;
