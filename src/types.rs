// src/types.rs
use crate::waveform::SampleBatch;

// GUI 发给采集线程的命令
#[derive(Clone, Debug)]
pub enum GuiCommand {
    StartStream,
    StopStream,
    // 调整模拟信号的通道数量
    SetChannelCount(usize),
}

// 采集线程发给 GUI 的消息
#[derive(Clone, Debug)]
pub enum AcqMessage {
    Log(String),
    StreamStatus(bool),   // 采集状态
    Batch(SampleBatch),   // 一次多通道采样
}
