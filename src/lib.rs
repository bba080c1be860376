#![no_std]

//! vtsched: a weighted, group-based virtual-time CPU scheduler.
//!
//! Schedulable contexts are grouped into a small fixed set of weighted
//! groups (driver, multimedia, app, background and the like). Each group
//! accrues virtual time scaled by its weight while one of its members
//! runs; the scheduler always dispatches the front of the ready list of
//! the group with the smallest virtual time, and programs an injected
//! timer with the absolute deadline at which the decision must be
//! revisited.
//!
//! The crate is `no_std` and allocation-free. It is meant to be driven
//! from a kernel's serialized event path: call [`scheduler::Scheduler::update`]
//! whenever time advanced or readiness changed, then dispatch whatever
//! [`scheduler::Scheduler::current`] returns.

pub mod logger;
pub mod scheduler;
pub mod timer;

#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {{
        $crate::logger::log($level, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kfatal {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::FATAL, $($arg)*);
    }};
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::ERROR, $($arg)*);
    }};
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::WARN, $($arg)*);
    }};
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::INFO, $($arg)*);
    }};
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::DEBUG, $($arg)*);
    }};
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::klog!($crate::logger::LogLevel::TRACE, $($arg)*);
    }};
}
