//! adscan passive BLE advertisement scanner firmware
//!
//! Listens for advertisements, reports the name and manufacturer data of each
//! one as NDJSON through the logger, and emits a status line once a second
//! from a deferred worker task.
//!
//! Three execution contexts:
//!   1. BLE stack runner: calls the report handler for every advertisement
//!   2. Timer task: only submits the status work item
//!   3. Work task: drains the work queue

#![no_std]
#![no_main]

use esp_backtrace as _;

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker, Timer};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use log::Level;
use static_cell::StaticCell;

use trouble_host::prelude::*;

use adscan::deferred::{Submit, WorkItem, WorkQueue};
use adscan::defaults::WORK_QUEUE_DEPTH;
use adscan::handler::{ReportHandler, ScanReportHandler};
use adscan::periodic::{Periodic, PeriodicWorker};
use adscan::protocol::{DeviceMessage, VERSION};
use adscan::scan::{AdvKind, AdvReport, ScanParams};
use adscan::sink::{LogSink, Sink};
use adscan::stats::ScanStats;
use adscan::status::StatusReport;
use adscan::ScanError;

type Queue = WorkQueue<'static, WORK_QUEUE_DEPTH>;
type Worker = PeriodicWorker<'static, 'static, WORK_QUEUE_DEPTH>;
type Status = StatusReport<'static, LogSink>;
type WakeSignal = Signal<CriticalSectionRawMutex, ()>;

// ── BLE scan event handler ──────────────────────────────────────────

/// EventHandler for BLE advertisement reports from trouble-host.
///
/// Converts each report and passes it to the scan report handler.
/// Called synchronously from the runner, so it must not block.
struct RadioReports<'a, H>(&'a H);

impl<H: ReportHandler> EventHandler for RadioReports<'_, H> {
    fn on_adv_reports(&self, mut it: LeAdvReportsIter<'_>) {
        while let Some(Ok(report)) = it.next() {
            let Ok(addr) = <[u8; 6]>::try_from(report.addr.raw()) else {
                continue;
            };
            self.0.on_report(&AdvReport {
                addr,
                rssi: report.rssi,
                kind: AdvKind::from(report.event_kind as u8),
                data: report.data,
            });
        }
    }
}

// ── Deferred work ───────────────────────────────────────────────────

fn to_ticks(d: core::time::Duration) -> Duration {
    Duration::from_micros(d.as_micros() as u64)
}

fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

/// Timer task. The expiry action only submits work and wakes the worker.
#[embassy_executor::task]
async fn timer_task(worker: &'static Worker, wake: &'static WakeSignal) {
    let schedule = worker.schedule();
    Timer::after(to_ticks(schedule.initial_delay)).await;

    let mut ticker = Ticker::every(to_ticks(schedule.period));
    while let Some(submit) = worker.on_expiry() {
        if submit == Submit::Queued {
            wake.signal(());
        }
        ticker.next().await;
    }
    log::info!("Timer task exiting");
}

/// Work task. Runs deferred bodies one at a time, outside the timer task.
#[embassy_executor::task]
async fn work_task(worker: &'static Worker, wake: &'static WakeSignal) {
    loop {
        wake.wait().await;
        worker.queue().run_pending();
    }
}

/// Report a start-up failure once and disarm the periodic worker.
/// The work task drains whatever is still queued. Scanning is not retried.
fn abandon_scan(sink: &impl Sink, worker: &Worker, wake: &WakeSignal, err: ScanError) {
    log::error!("Scanning disabled: {}", err);
    sink.emit(Level::Error, &DeviceMessage::ScanFailed { reason: err.as_str() });
    worker.disarm();
    wake.signal(());
}

// ── Entry point ──────────────────────────────────────────────────────

#[esp_rtos::main]
async fn main(spawner: embassy_executor::Spawner) {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // The BLE controller needs a heap; no WiFi coex, so this stays small.
    esp_alloc::heap_allocator!(size: 64 * 1024);

    // Start the RTOS (requires timer + software interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    log::info!("adscan v{} starting", VERSION);

    let sink = LogSink;
    let params = ScanParams::fast();

    // ── Long-lived components ──────────────────────────────────────────

    static STATS: StaticCell<ScanStats> = StaticCell::new();
    static QUEUE: StaticCell<Queue> = StaticCell::new();
    static STATUS: StaticCell<Status> = StaticCell::new();
    static ITEM: StaticCell<WorkItem<'static>> = StaticCell::new();
    static WORKER: StaticCell<Worker> = StaticCell::new();
    static WAKE: StaticCell<WakeSignal> = StaticCell::new();

    let stats: &'static ScanStats = STATS.init(ScanStats::new());
    let queue: &'static Queue = QUEUE.init(WorkQueue::new());
    let status: &'static Status = STATUS.init(StatusReport::new(sink, stats, uptime_ms));
    let item: &'static WorkItem<'static> = ITEM.init(WorkItem::new(status));
    let worker: &'static Worker = WORKER.init(PeriodicWorker::new(Periodic::default(), item, queue));
    let wake: &'static WakeSignal = WAKE.init(Signal::new());

    worker.start();
    spawner.spawn(timer_task(worker, wake)).unwrap();
    spawner.spawn(work_task(worker, wake)).unwrap();

    if let Err(e) = params.validate() {
        abandon_scan(&sink, worker, wake, e);
        return;
    }

    // ── BLE radio initialization ───────────────────────────────────────

    let connector =
        match esp_radio::ble::controller::BleConnector::new(peripherals.BT, Default::default()) {
            Ok(connector) => connector,
            Err(e) => {
                log::error!("BLE connector init failed: {:?}", e);
                abandon_scan(&sink, worker, wake, ScanError::StackUnavailable);
                return;
            }
        };

    log::info!("BLE connector initialized");

    let controller: ExternalController<_, 20> = ExternalController::new(connector);

    static HOST_RESOURCES: StaticCell<HostResources<DefaultPacketPool, 1, 1>> = StaticCell::new();
    let resources = HOST_RESOURCES.init(HostResources::new());

    let address = Address::random([0xff, 0x8f, 0x1a, 0x05, 0xe4, 0xac]);

    let stack = trouble_host::new(controller, resources).set_random_address(address);
    let Host {
        central,
        mut runner,
        ..
    } = stack.build();

    let handler: ScanReportHandler<'static, LogSink> = ScanReportHandler::new(&params, sink, stats);
    let events = RadioReports(&handler);

    // ── BLE orchestration ──────────────────────────────────────────────
    //
    // Two concurrent futures via join:
    //   1. BLE stack runner (drives HCI, delivers scan reports to handler)
    //   2. BLE scanner (starts the passive scan, keeps the session alive)

    let _ = embassy_futures::join::join(
        async {
            loop {
                if let Err(e) = runner.run_with_handler(&events).await {
                    log::error!("BLE runner error: {:?}", e);
                    Timer::after(Duration::from_secs(1)).await;
                }
            }
        },
        async {
            let mut scanner = trouble_host::scan::Scanner::new(central);
            let config = ScanConfig {
                active: params.mode.is_active(),
                interval: to_ticks(params.interval),
                window: to_ticks(params.window),
                ..Default::default()
            };

            let _session = match scanner.scan(&config).await {
                Ok(session) => session,
                Err(e) => {
                    log::error!("BLE scan failed to start: {:?}", e);
                    abandon_scan(&sink, worker, wake, ScanError::StartFailed);
                    return;
                }
            };

            sink.emit(
                Level::Info,
                &DeviceMessage::ScanStarted {
                    interval_ms: params.interval.as_millis() as u32,
                    window_ms: params.window.as_millis() as u32,
                    dedup: params.filter_duplicates,
                },
            );

            // Session stays alive as long as _session exists.
            // Reports flow through RadioReports on the runner.
            loop {
                Timer::after(Duration::from_secs(60)).await;
            }
        },
    )
    .await;
}
