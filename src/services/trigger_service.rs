//! services/trigger_service.rs
//! Trigger "on create" de `emergency_alerts`: cada `AlertCreated` invoca el
//! dispatcher exactamente una vez, en su propio task.

use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        oneshot,
    },
    task::{JoinError, JoinHandle, JoinSet},
};

use crate::{
    models::alert_model::{AlertRecord, DispatchSummary},
    services::dispatch_service::DispatchService,
};

/// Evento de creación: el registro completo y su id.
#[derive(Debug, Clone)]
pub struct AlertCreated {
    pub alert_id: String,
    pub record: AlertRecord,
}

pub fn event_bus() -> (UnboundedSender<AlertCreated>, UnboundedReceiver<AlertCreated>) {
    mpsc::unbounded_channel()
}

pub struct TriggerWorker {
    dispatch_service: DispatchService,
    events: UnboundedReceiver<AlertCreated>,
}

impl TriggerWorker {
    pub fn new(dispatch_service: DispatchService, events: UnboundedReceiver<AlertCreated>) -> Self {
        Self {
            dispatch_service,
            events,
        }
    }

    /// Corre hasta que se cierran todos los emisores del bus o hasta
    /// `TriggerHandle::shutdown`.
    pub fn spawn(self) -> TriggerHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        TriggerHandle {
            stop: stop_tx,
            task: tokio::spawn(self.run(stop_rx)),
        }
    }

    async fn run(mut self, mut stop: oneshot::Receiver<()>) {
        log::info!("(trigger_worker) Esperando alertas nuevas...");
        let mut in_flight = JoinSet::new();
        let mut watching_stop = true;

        loop {
            tokio::select! {
                stopped = &mut stop, if watching_stop => {
                    watching_stop = false;
                    // Handle soltado sin shutdown: seguimos hasta que se cierre el bus
                    if stopped.is_ok() {
                        // Lo que ya está en el bus se sigue entregando
                        self.events.close();
                        log::info!("(trigger_worker) Cerrando bus, drenando alertas pendientes...");
                    }
                }
                event = self.events.recv() => match event {
                    Some(event) => {
                        let service = self.dispatch_service.clone();
                        in_flight.spawn(async move {
                            handle_event(&service, event).await;
                        });
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        log::info!("(trigger_worker) Bus de eventos cerrado, terminando.");
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        log::error!("(trigger_worker) Task de dispatch abortado: {:?}", e);
    }
}

pub struct TriggerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TriggerHandle {
    /// Deja de aceptar eventos y espera a que terminen los dispatches
    /// encolados y en curso.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            log::error!("(trigger_worker) El worker terminó con error: {:?}", e);
        }
    }
}

/// Una invocación del trigger. Un error aquí es un fallo de la invocación
/// completa: se registra y no se reintenta.
pub async fn handle_event(service: &DispatchService, event: AlertCreated) -> Option<DispatchSummary> {
    match service.dispatch(&event.alert_id, &event.record).await {
        Ok(summary) => summary,
        Err(e) => {
            log::error!(
                "(trigger_worker) Fallo la invocación para la alerta {}: {:?}",
                event.alert_id,
                e
            );
            None
        }
    }
}
