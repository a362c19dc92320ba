//! `ApplicationHandler` for the shell.
//!
//! Translates winit events into `WindowManager` calls: `CloseRequested`
//! becomes a close/closed pair, mouse side buttons become app commands and
//! user events carry second-instance hand-offs, actions and navigations.

use super::UserEvent;
use super::accelerators::accelerator_action;
use super::winit_window::{WinitHost, host_window_id};
use crate::cli::RuntimeOptions;
use crate::events::{AppCommand, LifecycleEvent};
use crate::window_manager::WindowManager;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::keyboard::ModifiersState;
use winit::window::WindowId;

pub struct AppState {
    manager: WindowManager,
    runtime_options: RuntimeOptions,
    proxy: EventLoopProxy<UserEvent>,
    /// Whether the startup windows have been opened
    started: bool,
    modifiers: ModifiersState,
}

impl AppState {
    pub fn new(
        manager: WindowManager,
        runtime_options: RuntimeOptions,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        Self {
            manager,
            runtime_options,
            proxy,
            started: false,
            modifiers: ModifiersState::empty(),
        }
    }

    fn exit_if_requested(&self, event_loop: &ActiveEventLoop) {
        if self.manager.should_exit() {
            log::info!("Exiting event loop");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<UserEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let mut host = WinitHost::new(event_loop, &self.proxy);
        if self.runtime_options.reset_windows {
            self.manager.reset_windows(&mut host);
        } else {
            self.manager.open_windows(&mut host);
        }
        if self.runtime_options.new_window {
            self.manager
                .open_new_window(&mut host, self.runtime_options.url.as_deref());
        }

        if self.manager.window_count() == 0 {
            log::error!("No window could be created, exiting");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let id = host_window_id(window_id);
        let mut host = WinitHost::new(event_loop, &self.proxy);

        match event {
            WindowEvent::CloseRequested => self.manager.close_window(&mut host, id),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(action) = accelerator_action(&self.modifiers, &event.logical_key) {
                    self.manager.handle_action(&mut host, action);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let command = match button {
                    MouseButton::Back => Some(AppCommand::BrowserBackward),
                    MouseButton::Forward => Some(AppCommand::BrowserForward),
                    _ => None,
                };
                if let Some(command) = command {
                    self.manager
                        .dispatch(&mut host, id, LifecycleEvent::AppCommand(command));
                }
            }
            _ => {}
        }

        self.exit_if_requested(event_loop);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        let mut host = WinitHost::new(event_loop, &self.proxy);
        match event {
            UserEvent::SecondInstance(message) => {
                self.manager.handle_second_instance(&mut host, &message)
            }
            UserEvent::Action(action) => self.manager.handle_action(&mut host, action),
            UserEvent::Navigated {
                window,
                url,
                in_page,
            } => self
                .manager
                .dispatch(&mut host, window, LifecycleEvent::Navigated { url, in_page }),
        }

        self.exit_if_requested(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!(
            "Event loop exiting with {} windows open",
            self.manager.window_count()
        );
    }
}
