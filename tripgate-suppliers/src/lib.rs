pub mod etg;
pub mod mailer;
pub mod maps;
pub mod payments;

pub use etg::{EtgClient, EtgConfig};
pub use mailer::{BookingEmail, MailerClient, MailerConfig};
pub use maps::{MapsClient, MapsError};
pub use payments::{PaypalGateway, RazorpayGateway};
