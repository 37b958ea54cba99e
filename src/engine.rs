// src/engine.rs
use crate::source::{SampleSource, SineSource};
use crate::types::*;
use log::warn;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

// 默认 33ms 一批（约 30Hz）
const BATCH_INTERVAL: Duration = Duration::from_millis(33);
const DEFAULT_CHANNELS: usize = 3;

// 采集线程：命令循环 + 数据流循环。
// 波形引擎只在渲染线程被触碰；这里只负责产出批次并通过通道移交，
// 渲染线程在每一帧抽取后再调用 append_batch。
pub fn spawn_thread(tx: Sender<AcqMessage>, rx_cmd: Receiver<GuiCommand>) {
    thread::spawn(move || {
        tx.send(AcqMessage::Log("Acquisition engine ready.".to_owned())).ok();

        let mut source = match SineSource::new(DEFAULT_CHANNELS, BATCH_INTERVAL.as_secs_f64()) {
            Ok(s) => s,
            Err(e) => {
                warn!("signal source init failed: {e}");
                tx.send(AcqMessage::Log(format!("Source error: {e}"))).ok();
                return;
            }
        };
        let mut is_streaming = false;

        loop {
            // 1. 消息处理 (处理 GUI 发来的命令)
            for _ in 0..10 {
                if let Ok(cmd) = rx_cmd.try_recv() {
                    match cmd {
                        GuiCommand::StartStream => {
                            is_streaming = true;
                            tx.send(AcqMessage::StreamStatus(true)).ok();
                            tx.send(AcqMessage::Log("Stream started".to_owned())).ok();
                        }
                        GuiCommand::StopStream => {
                            is_streaming = false;
                            tx.send(AcqMessage::StreamStatus(false)).ok();
                            tx.send(AcqMessage::Log("Stream stopped".to_owned())).ok();
                        }
                        GuiCommand::SetChannelCount(n) => {
                            if let Err(e) = source.set_channel_count(n) {
                                tx.send(AcqMessage::Log(format!("Source error: {e}"))).ok();
                            }
                        }
                    }
                } else {
                    break;
                }
            }

            // 2. 数据流循环
            if is_streaming {
                match source.next_batch() {
                    Ok(Some(batch)) => {
                        // GUI 已经退出时结束线程
                        if tx.send(AcqMessage::Batch(batch)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        is_streaming = false;
                        tx.send(AcqMessage::Log(format!("Source error: {e}"))).ok();
                    }
                }
                thread::sleep(BATCH_INTERVAL);
            } else {
                thread::sleep(Duration::from_millis(50));
            }
        }
    });
}
