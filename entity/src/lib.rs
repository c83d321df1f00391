//! Persistent records of the HR dashboard.
//!
//! `employee` is the primary table; attendance, leave and exit records hang
//! off it and are removed together with their employee.

pub mod attendance;
pub mod attrition_record;
pub mod employee;
pub mod leave_record;
