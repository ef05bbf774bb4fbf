mod cc_state;
mod packet;
mod queues;
mod sim_time;
mod simulator;
mod thresholds;
