//! 传输层/协议模块
//!
//! 包含一个可插拔拥塞算法（NewReno / DCTCP / D2TCP）的简化 TCP 实现。

pub mod tcp;
