mod construction;
mod gravity;
mod surface;
