mod health_check;
mod helpers;
mod history;
mod registration;
mod stores;
