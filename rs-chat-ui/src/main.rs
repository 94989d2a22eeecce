use std::time::{Duration, Instant};

use eframe::{Frame, egui};
use egui::Context;

use reqwest::Result;
use reqwest::blocking::Client;

/// Delay between two revealed characters of an animated reply.
/// The reply itself is fully computed before the animation starts;
/// this is presentation only.
const TYPE_INTERVAL: Duration = Duration::from_millis(37);

/// One transcript line.
struct ChatLine {
    from_user: bool,
    text: String,
}

/// A reply being revealed character by character.
struct AnimatedReply {
    chars: Vec<char>,
    revealed: usize,
    last_tick: Instant,
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request to `/v1/respond` with the prompt.
    fn get_response(&self, prompt: &str) -> Result<String> {
        let response = self.client
            .get("http://127.0.0.1:5000/v1/respond")
            .query(&[("prompt", prompt)])
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }
}

/// Global UI state (MUST persist between frames in egui).
struct ChatUI {
    rest: RESTContext,
    transcript: Vec<ChatLine>,
    input: String,

    /// While a reply is being revealed, the input line stays locked,
    /// like the original chat window behaves.
    animating: Option<AnimatedReply>,
}

impl ChatUI {
    /// Initializes the UI with the welcome banner.
    fn new() -> Result<Self> {
        let mut chat = Self {
            rest: RESTContext::new()?,
            transcript: Vec::new(),
            input: String::new(),
            animating: None,
        };
        for line in [
            "Welcome to rs-chat!",
            "I reply by walking a word graph, so my sentences are \
             (close to) grammatical without meaning anything.",
            "Type a message and press Send.",
        ] {
            chat.transcript.push(ChatLine { from_user: false, text: line.to_owned() });
        }
        Ok(chat)
    }

    /// Sends the current input line to the server and starts revealing
    /// the reply.
    fn send_prompt(&mut self) {
        let prompt = self.input.trim().to_owned();
        if prompt.is_empty() || self.animating.is_some() {
            return;
        }
        self.input.clear();
        self.transcript.push(ChatLine { from_user: true, text: prompt.clone() });

        match self.rest.get_response(&prompt) {
            Ok(reply) => {
                self.transcript.push(ChatLine { from_user: false, text: String::new() });
                self.animating = Some(AnimatedReply {
                    chars: reply.chars().collect(),
                    revealed: 0,
                    last_tick: Instant::now(),
                });
            }
            Err(e) => {
                self.transcript.push(ChatLine { from_user: false, text: format!("Error: {e}") });
            }
        }
    }

    /// Reveals the next character of the pending reply when its tick is
    /// due, and unlocks the input once the reply is fully shown.
    fn advance_animation(&mut self) {
        let Some(animation) = &mut self.animating else {
            return;
        };

        if animation.revealed < animation.chars.len()
            && animation.last_tick.elapsed() >= TYPE_INTERVAL
        {
            animation.revealed += 1;
            animation.last_tick = Instant::now();
            if let Some(line) = self.transcript.last_mut() {
                line.text = animation.chars[..animation.revealed].iter().collect();
            }
        }

        if animation.revealed >= animation.chars.len() {
            self.animating = None;
        }
    }
}

impl eframe::App for ChatUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        self.advance_animation();
        if self.animating.is_some() {
            ctx.request_repaint_after(TYPE_INTERVAL);
        }

        let locked = self.animating.is_some();

        egui::TopBottomPanel::bottom("input_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let input_line = ui.add_enabled(
                    !locked,
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text("Say something...")
                        .desired_width(ui.available_width() - 70.0),
                );
                let send_clicked =
                    ui.add_enabled(!locked, egui::Button::new("Send")).clicked();

                let enter_pressed = input_line.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if send_clicked || enter_pressed {
                    self.send_prompt();
                    input_line.request_focus();
                }
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.transcript {
                        let who = if line.from_user { "You" } else { "rs-chat" };
                        let text = format!("{}: {}", who, line.text);
                        if line.from_user {
                            ui.label(egui::RichText::new(text).strong());
                        } else {
                            ui.label(text);
                        }
                        ui.add_space(4.0);
                    }
                });
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([460.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "rs-chat",
        options,
        Box::new(|_| Ok(Box::new(ChatUI::new()?))),
    )
}
